//! Test utilities for building packages in memory.
//!
//! This module provides builders for sections, cpio archives and whole
//! packages so tests do not depend on binary fixtures. It is compiled
//! only for unit tests or with the `test-utils` feature.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use std::io::Write;

use md5::Digest;
use md5::Md5;
use sha2::Sha256;

use crate::formats::Compressor;
use crate::formats::cpio::TRAILER_NAME;
use crate::lead::LEAD_MAGIC;
use crate::metadata::FileFlags;
use crate::metadata::tags::sigtag;
use crate::metadata::tags::tag;
use crate::section::SECTION_MAGIC;
use crate::section::ValueType;
use crate::section::alignment_padding;

struct RawTag {
    tag: i32,
    value_type: ValueType,
    count: u32,
    data: Vec<u8>,
}

/// Builder for encoded sections.
///
/// Descriptors are written in insertion order and their data is packed into
/// the store without alignment.
///
/// # Examples
///
/// ```
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::section::decode;
/// use rpmkit_core::test_utils::SectionBuilder;
///
/// let bytes = SectionBuilder::new().string(1000, "hello").int32(1009, &[42]).build();
/// let section = decode(&mut &bytes[..], &ReadConfig::default()).unwrap();
/// assert_eq!(section.get_string(1000).unwrap(), "hello");
/// ```
#[derive(Default)]
pub struct SectionBuilder {
    tags: Vec<RawTag>,
}

impl SectionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor with raw store data.
    #[must_use]
    pub fn raw(mut self, tag: i32, value_type: ValueType, count: u32, data: &[u8]) -> Self {
        self.tags.push(RawTag {
            tag,
            value_type,
            count,
            data: data.to_vec(),
        });
        self
    }

    /// Adds a `StringZ` tag.
    #[must_use]
    pub fn string(self, tag: i32, value: &str) -> Self {
        self.raw(tag, ValueType::StringZ, 1, &nul_terminated(&[value]))
    }

    /// Adds an `I18nString` tag with a single variant.
    #[must_use]
    pub fn i18n_string(self, tag: i32, value: &str) -> Self {
        self.raw(tag, ValueType::I18nString, 1, &nul_terminated(&[value]))
    }

    /// Adds a `StringArray` tag.
    #[must_use]
    pub fn string_array(self, tag: i32, values: &[&str]) -> Self {
        let count = values.len() as u32;
        self.raw(tag, ValueType::StringArray, count, &nul_terminated(values))
    }

    /// Adds an `Int16` tag.
    #[must_use]
    pub fn int16(self, tag: i32, values: &[i16]) -> Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.raw(tag, ValueType::Int16, values.len() as u32, &data)
    }

    /// Adds an `Int32` tag.
    #[must_use]
    pub fn int32(self, tag: i32, values: &[i32]) -> Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.raw(tag, ValueType::Int32, values.len() as u32, &data)
    }

    /// Adds a `Binary` tag.
    #[must_use]
    pub fn binary(self, tag: i32, value: &[u8]) -> Self {
        self.raw(tag, ValueType::Binary, value.len() as u32, value)
    }

    /// Drops every descriptor for `tag`.
    #[must_use]
    pub fn without(mut self, tag: i32) -> Self {
        self.tags.retain(|t| t.tag != tag);
        self
    }

    /// Size of the store the builder will produce.
    #[must_use]
    pub fn store_len(&self) -> usize {
        self.tags.iter().map(|t| t.data.len()).sum()
    }

    /// Encodes the section.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut index = Vec::with_capacity(self.tags.len() * 16);
        let mut store = Vec::with_capacity(self.store_len());
        for t in &self.tags {
            index.extend_from_slice(&t.tag.to_be_bytes());
            index.extend_from_slice(&t.value_type.code().to_be_bytes());
            index.extend_from_slice(&(store.len() as u32).to_be_bytes());
            index.extend_from_slice(&t.count.to_be_bytes());
            store.extend_from_slice(&t.data);
        }

        let mut out = Vec::with_capacity(16 + index.len() + store.len());
        out.extend_from_slice(&SECTION_MAGIC);
        out.push(1);
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(self.tags.len() as u32).to_be_bytes());
        out.extend_from_slice(&(store.len() as u32).to_be_bytes());
        out.extend_from_slice(&index);
        out.extend_from_slice(&store);
        out
    }
}

fn nul_terminated(values: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        out.extend_from_slice(v.as_bytes());
        out.push(0);
    }
    out
}

/// Builder for cpio newc archives.
///
/// # Examples
///
/// ```
/// use rpmkit_core::test_utils::CpioBuilder;
///
/// let archive = CpioBuilder::new().file("./etc/motd", 0o100_644, b"welcome\n").build();
/// assert_eq!(&archive[..6], b"070701");
/// ```
#[derive(Default)]
pub struct CpioBuilder {
    crc: bool,
    inode: u64,
    data: Vec<u8>,
}

impl CpioBuilder {
    /// Creates an empty builder producing `070701` entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `070702` entries with content checksums.
    #[must_use]
    pub const fn crc(mut self) -> Self {
        self.crc = true;
        self
    }

    /// Appends an entry with mtime 0.
    #[must_use]
    pub fn file(self, name: &str, mode: u32, content: &[u8]) -> Self {
        self.entry(name, mode, 0, content)
    }

    /// Appends an entry.
    #[must_use]
    pub fn entry(mut self, name: &str, mode: u32, mtime: u32, content: &[u8]) -> Self {
        self.inode += 1;
        let checksum = if self.crc {
            content
                .iter()
                .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
        } else {
            0
        };
        self.write_header(name, mode, mtime, content.len() as u64, checksum);
        self.data.extend_from_slice(content);
        pad4(&mut self.data);
        self
    }

    fn write_header(&mut self, name: &str, mode: u32, mtime: u32, size: u64, checksum: u32) {
        let magic = if self.crc { "070702" } else { "070701" };
        let fields = [
            self.inode,
            u64::from(mode),
            0,
            0,
            1,
            u64::from(mtime),
            size,
            0,
            0,
            0,
            0,
            name.len() as u64 + 1,
            u64::from(checksum),
        ];
        self.data.extend_from_slice(magic.as_bytes());
        for field in fields {
            write!(self.data, "{field:08x}").unwrap();
        }
        self.data.extend_from_slice(name.as_bytes());
        self.data.push(0);
        pad4(&mut self.data);
    }

    /// Appends the trailer and returns the archive.
    #[must_use]
    pub fn build(mut self) -> Vec<u8> {
        self.inode = 0;
        self.write_header(TRAILER_NAME, 0, 0, 0, 0);
        self.data
    }
}

fn pad4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

/// Compresses `data` with `codec`.
#[must_use]
pub fn compress(codec: Compressor, data: &[u8]) -> Vec<u8> {
    match codec {
        Compressor::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compressor::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compressor::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compressor::Lzma => {
            let options = xz2::stream::LzmaOptions::new_preset(6).unwrap();
            let stream = xz2::stream::Stream::new_lzma_encoder(&options).unwrap();
            let mut encoder = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compressor::Zstd => zstd::stream::encode_all(data, 3).unwrap(),
    }
}

/// Encodes a 3.0 binary-package lead.
#[must_use]
pub fn lead_bytes(name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(96);
    out.extend_from_slice(&LEAD_MAGIC);
    out.extend_from_slice(&[3, 0]);
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    let mut padded = [0u8; 66];
    let len = name.len().min(65);
    padded[..len].copy_from_slice(&name.as_bytes()[..len]);
    out.extend_from_slice(&padded);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&5u16.to_be_bytes());
    out.extend_from_slice(&[0; 16]);
    out
}

enum TestDigest {
    Md5,
    Sha256,
    Hex(String),
}

/// A file to place in a [`PackageBuilder`].
pub struct TestFile {
    path: String,
    content: Vec<u8>,
    mode: u16,
    mtime: u32,
    flags: FileFlags,
    digest: TestDigest,
}

impl TestFile {
    /// A regular file with mode `0644`, a fixed mtime and an MD5 digest.
    #[must_use]
    pub fn new(path: &str, content: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            content: content.to_vec(),
            mode: 0o100_644,
            mtime: 1_700_000_000,
            flags: FileFlags::empty(),
            digest: TestDigest::Md5,
        }
    }

    /// A directory; it has no content and no archive entry.
    #[must_use]
    pub fn directory(path: &str) -> Self {
        Self {
            mode: 0o040_755,
            digest: TestDigest::Hex(String::new()),
            ..Self::new(path, b"")
        }
    }

    /// Sets the declared and archived mode.
    #[must_use]
    pub const fn mode(mut self, mode: u16) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the declared and archived mtime.
    #[must_use]
    pub const fn mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    /// Sets the file flags.
    #[must_use]
    pub const fn flags(mut self, flags: FileFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Records a SHA-256 digest instead of MD5.
    #[must_use]
    pub fn sha256(mut self) -> Self {
        self.digest = TestDigest::Sha256;
        self
    }

    /// Records `digest` verbatim.
    #[must_use]
    pub fn digest_hex(mut self, digest: &str) -> Self {
        self.digest = TestDigest::Hex(digest.to_string());
        self
    }

    fn digest_string(&self) -> String {
        match &self.digest {
            TestDigest::Md5 => hex::encode(Md5::digest(&self.content)),
            TestDigest::Sha256 => hex::encode(Sha256::digest(&self.content)),
            TestDigest::Hex(s) => s.clone(),
        }
    }

    fn split(&self) -> (&str, &str) {
        match self.path.rfind('/') {
            Some(i) => self.path.split_at(i + 1),
            None => ("", &self.path),
        }
    }
}

/// Builder for complete packages.
///
/// The signature section carries a correct size and MD5 unless replaced.
///
/// # Examples
///
/// ```
/// use rpmkit_core::Package;
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::test_utils::PackageBuilder;
/// use rpmkit_core::test_utils::TestFile;
///
/// let bytes = PackageBuilder::new("hello", "1.0", "1")
///     .file(TestFile::new("/usr/share/hello.txt", b"hello\n"))
///     .build();
/// let package = Package::from_reader(&bytes[..], &ReadConfig::default()).unwrap();
/// assert_eq!(package.metadata().name().unwrap(), "hello");
/// ```
pub struct PackageBuilder {
    name: String,
    version: String,
    release: String,
    epoch: Option<u32>,
    arch: String,
    codec: Compressor,
    compressor_name: String,
    files: Vec<TestFile>,
    flat_names: bool,
    changelog: Vec<(String, String, i32)>,
    omitted: Vec<i32>,
    signature_store_len: Option<usize>,
}

impl PackageBuilder {
    /// Creates a gzip-compressed `x86_64` package with no files.
    #[must_use]
    pub fn new(name: &str, version: &str, release: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            epoch: None,
            arch: "x86_64".to_string(),
            codec: Compressor::Gzip,
            compressor_name: "gzip".to_string(),
            files: Vec::new(),
            flat_names: false,
            changelog: Vec::new(),
            omitted: Vec::new(),
            signature_store_len: None,
        }
    }

    /// Sets the epoch.
    #[must_use]
    pub const fn epoch(mut self, epoch: u32) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Sets the architecture.
    #[must_use]
    pub fn arch(mut self, arch: &str) -> Self {
        self.arch = arch.to_string();
        self
    }

    /// Adds a file.
    #[must_use]
    pub fn file(mut self, file: TestFile) -> Self {
        self.files.push(file);
        self
    }

    /// Compresses the payload with the named codec.
    #[must_use]
    pub fn compressor(mut self, name: &str) -> Self {
        self.codec = Compressor::from_name(name).unwrap();
        self.compressor_name = name.to_string();
        self
    }

    /// Records `name` as the compressor without changing the gzip payload.
    #[must_use]
    pub fn compressor_name(mut self, name: &str) -> Self {
        self.compressor_name = name.to_string();
        self
    }

    /// Encodes file paths as a flat name list instead of split names.
    #[must_use]
    pub const fn flat_names(mut self) -> Self {
        self.flat_names = true;
        self
    }

    /// Adds a changelog entry.
    #[must_use]
    pub fn changelog(mut self, author: &str, text: &str, time: i32) -> Self {
        self.changelog
            .push((author.to_string(), text.to_string(), time));
        self
    }

    /// Leaves `tag` out of the metadata section.
    #[must_use]
    pub fn without_tag(mut self, tag: i32) -> Self {
        self.omitted.push(tag);
        self
    }

    /// Replaces the signature with a single filler tag of `len` store bytes.
    #[must_use]
    pub const fn signature_store_len(mut self, len: usize) -> Self {
        self.signature_store_len = Some(len);
        self
    }

    /// Builds the metadata section.
    #[must_use]
    pub fn header_section(&self) -> SectionBuilder {
        let archive_size = self.archive_bytes().len();
        let installed: u32 = self.files.iter().map(|f| f.content.len() as u32).sum();
        let mut s = SectionBuilder::new()
            .string_array(tag::HEADER_I18N_TABLE, &["C"])
            .string(tag::NAME, &self.name)
            .string(tag::VERSION, &self.version)
            .string(tag::RELEASE, &self.release);
        if let Some(epoch) = self.epoch {
            s = s.int32(tag::EPOCH, &[epoch as i32]);
        }
        s = s
            .i18n_string(tag::SUMMARY, &format!("The {} test package", self.name))
            .i18n_string(tag::DESCRIPTION, "Built in memory for tests.")
            .int32(tag::BUILD_TIME, &[1_700_000_000])
            .string(tag::BUILD_HOST, "build.example.com")
            .int32(tag::SIZE, &[installed as i32])
            .string(tag::LICENSE, "MIT")
            .i18n_string(tag::GROUP, "Applications/System")
            .string(tag::URL, &format!("https://example.com/{}", self.name))
            .string(tag::OS, "linux")
            .string(tag::ARCH, &self.arch)
            .string(
                tag::SOURCE_RPM,
                &format!("{}-{}-{}.src.rpm", self.name, self.version, self.release),
            )
            .int32(tag::ARCHIVE_SIZE, &[archive_size as i32]);

        if !self.files.is_empty() {
            s = self.file_tags(s);
        }

        if !self.changelog.is_empty() {
            let times: Vec<i32> = self.changelog.iter().map(|c| c.2).collect();
            let names: Vec<&str> = self.changelog.iter().map(|c| c.0.as_str()).collect();
            let texts: Vec<&str> = self.changelog.iter().map(|c| c.1.as_str()).collect();
            s = s
                .int32(tag::CHANGELOG_TIME, &times)
                .string_array(tag::CHANGELOG_NAME, &names)
                .string_array(tag::CHANGELOG_TEXT, &texts);
        }

        s = s
            .string(tag::PAYLOAD_FORMAT, "cpio")
            .string(tag::PAYLOAD_COMPRESSOR, &self.compressor_name)
            .string(tag::PAYLOAD_FLAGS, "9");

        for &omitted in &self.omitted {
            s = s.without(omitted);
        }
        s
    }

    fn file_tags(&self, mut s: SectionBuilder) -> SectionBuilder {
        let n = self.files.len();
        if self.flat_names {
            let paths: Vec<&str> = self.files.iter().map(|f| f.path.as_str()).collect();
            s = s.string_array(tag::OLD_FILENAMES, &paths);
        } else {
            let mut dirnames: Vec<&str> = Vec::new();
            let mut basenames = Vec::with_capacity(n);
            let mut indexes = Vec::with_capacity(n);
            for file in &self.files {
                let (dir, base) = file.split();
                let index = dirnames.iter().position(|d| *d == dir).unwrap_or_else(|| {
                    dirnames.push(dir);
                    dirnames.len() - 1
                });
                basenames.push(base);
                indexes.push(index as i32);
            }
            s = s
                .string_array(tag::BASENAMES, &basenames)
                .string_array(tag::DIRNAMES, &dirnames)
                .int32(tag::DIR_INDEXES, &indexes);
        }

        let sizes: Vec<i32> = self.files.iter().map(|f| f.content.len() as i32).collect();
        let modes: Vec<i16> = self.files.iter().map(|f| f.mode.cast_signed()).collect();
        let mtimes: Vec<i32> = self.files.iter().map(|f| f.mtime.cast_signed()).collect();
        let digests: Vec<String> = self.files.iter().map(TestFile::digest_string).collect();
        let digests: Vec<&str> = digests.iter().map(String::as_str).collect();
        let flags: Vec<i32> = self
            .files
            .iter()
            .map(|f| f.flags.bits().cast_signed())
            .collect();
        let inodes: Vec<i32> = (1..=n as i32).collect();

        s.int32(tag::FILE_SIZES, &sizes)
            .int16(tag::FILE_MODES, &modes)
            .int16(tag::FILE_RDEVS, &vec![0; n])
            .int32(tag::FILE_MTIMES, &mtimes)
            .string_array(tag::FILE_DIGESTS, &digests)
            .string_array(tag::FILE_LINKTOS, &vec![""; n])
            .int32(tag::FILE_FLAGS, &flags)
            .string_array(tag::FILE_USERNAME, &vec!["root"; n])
            .string_array(tag::FILE_GROUPNAME, &vec!["root"; n])
            .int32(tag::FILE_DEVICES, &vec![1; n])
            .int32(tag::FILE_INODES, &inodes)
            .string_array(tag::FILE_LANGS, &vec![""; n])
    }

    /// Encodes the metadata section.
    #[must_use]
    pub fn header_bytes(&self) -> Vec<u8> {
        self.header_section().build()
    }

    /// Encodes the uncompressed archive; files without content get no entry.
    #[must_use]
    pub fn archive_bytes(&self) -> Vec<u8> {
        self.files
            .iter()
            .filter(|f| !f.content.is_empty())
            .fold(CpioBuilder::new(), |cpio, f| {
                cpio.entry(
                    &format!(".{}", f.path),
                    u32::from(f.mode),
                    f.mtime,
                    &f.content,
                )
            })
            .build()
    }

    /// Encodes the compressed payload.
    #[must_use]
    pub fn payload_bytes(&self) -> Vec<u8> {
        compress(self.codec, &self.archive_bytes())
    }

    /// Encodes the whole package.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let header = self.header_bytes();
        let archive = self.archive_bytes();
        let payload = compress(self.codec, &archive);

        let signature = match self.signature_store_len {
            Some(len) => SectionBuilder::new().binary(999, &vec![0xAA; len]),
            None => {
                let mut hasher = Md5::new();
                hasher.update(&header);
                hasher.update(&payload);
                SectionBuilder::new()
                    .int32(sigtag::SIZE, &[(header.len() + payload.len()) as i32])
                    .binary(sigtag::MD5, &hasher.finalize())
                    .int32(sigtag::PAYLOAD_SIZE, &[archive.len() as i32])
            }
        };

        let mut out = lead_bytes(&format!("{}-{}-{}", self.name, self.version, self.release));
        out.extend_from_slice(&signature.build());
        out.resize(out.len() + alignment_padding(signature.store_len()), 0);
        out.extend_from_slice(&header);
        out.extend_from_slice(&payload);
        out
    }
}
