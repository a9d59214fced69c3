//! Streaming reader for the cpio "newc" archive carried in the payload.
//!
//! Each entry is a 110-byte ASCII header, a NUL-terminated name padded to a
//! 4-byte boundary, and the file content padded to a 4-byte boundary:
//!
//! ```text
//! +--------+------------------------+------+-----+---------+-----+
//! | magic  | 13 x 8 hex-digit fields| name | pad | content | pad |
//! |  6 B   |         104 B          | NUL  |     |         |     |
//! +--------+------------------------+------+-----+---------+-----+
//! ```
//!
//! An entry named `TRAILER!!!` ends the archive.

use std::fmt;
use std::io::Read;

use log::debug;
use log::trace;
use md5::Digest;
use md5::Md5;
use sha2::Sha256;

use crate::Result;
use crate::RpmError;
use crate::config::ReadConfig;
use crate::io::CountingReader;
use crate::io::padding_to;
use crate::io::read_exact_or_truncated;
use crate::io::skip_bytes;
use crate::types::FileKind;

/// Size of a newc header including its magic.
pub const NEWC_HEADER_SIZE: usize = 110;

/// Name of the entry that terminates an archive.
pub const TRAILER_NAME: &str = "TRAILER!!!";

/// Longest entry name accepted before the terminating NUL.
pub const MAX_NAME_LEN: usize = 4096;

const MAGIC_LEN: usize = 6;
const FIELD_LEN: usize = 8;
const FIELD_NAMES: [&str; 13] = [
    "inode",
    "mode",
    "uid",
    "gid",
    "nlink",
    "mtime",
    "filesize",
    "devmajor",
    "devminor",
    "rdevmajor",
    "rdevminor",
    "namesize",
    "checksum",
];

/// Header variant, selected by the entry magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpioFormat {
    /// `070701`: no content checksum.
    NewAscii,
    /// `070702`: header carries a content checksum.
    NewCrc,
}

impl CpioFormat {
    fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"070701" => Some(Self::NewAscii),
            b"070702" => Some(Self::NewCrc),
            _ => None,
        }
    }

    /// Returns the six magic bytes of this variant.
    #[must_use]
    pub const fn magic(self) -> &'static [u8; 6] {
        match self {
            Self::NewAscii => b"070701",
            Self::NewCrc => b"070702",
        }
    }
}

impl fmt::Display for CpioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewAscii => f.write_str("newc"),
            Self::NewCrc => f.write_str("crc"),
        }
    }
}

/// Decoded entry header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpioHeader {
    /// Variant named by the magic.
    pub format: CpioFormat,
    /// Inode number.
    pub inode: u64,
    /// Full `st_mode`, type bits included.
    pub mode: u64,
    /// Owner user id.
    pub uid: u64,
    /// Owner group id.
    pub gid: u64,
    /// Link count.
    pub nlink: u64,
    /// Modification time in seconds since the epoch.
    pub mtime: u64,
    /// Content length in bytes, excluding padding.
    pub filesize: u64,
    /// Major number of the containing device.
    pub dev_major: u64,
    /// Minor number of the containing device.
    pub dev_minor: u64,
    /// Major number for device nodes.
    pub rdev_major: u64,
    /// Minor number for device nodes.
    pub rdev_minor: u64,
    /// Declared name length including the NUL; kept but not trusted.
    pub namesize: u64,
    /// Byte-sum checksum of the content; zero for `newc`.
    pub checksum: u64,
}

impl CpioHeader {
    fn parse(format: CpioFormat, raw: &[u8], offset: u64) -> Result<Self> {
        let mut fields = [0u64; 13];
        for (i, (chunk, field)) in raw.chunks_exact(FIELD_LEN).zip(&mut fields).enumerate() {
            *field = parse_hex(chunk).ok_or_else(|| RpmError::MalformedArchiveHeader {
                offset,
                reason: format!(
                    "field {} is not hexadecimal: {:?}",
                    FIELD_NAMES[i],
                    String::from_utf8_lossy(chunk)
                ),
            })?;
        }
        let [
            inode,
            mode,
            uid,
            gid,
            nlink,
            mtime,
            filesize,
            dev_major,
            dev_minor,
            rdev_major,
            rdev_minor,
            namesize,
            checksum,
        ] = fields;
        Ok(Self {
            format,
            inode,
            mode,
            uid,
            gid,
            nlink,
            mtime,
            filesize,
            dev_major,
            dev_minor,
            rdev_major,
            rdev_minor,
            namesize,
            checksum,
        })
    }
}

fn parse_hex(field: &[u8]) -> Option<u64> {
    if !field.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(field).ok()?;
    u64::from_str_radix(text, 16).ok()
}

/// One decoded archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpioEntry {
    /// Decoded header.
    pub header: CpioHeader,
    /// Entry name without the terminating NUL, usually `./`-prefixed.
    pub name: String,
    /// File content.
    pub content: Vec<u8>,
    /// Stream offset of the entry header.
    pub offset: u64,
}

impl CpioEntry {
    /// MD5 of the content.
    #[must_use]
    pub fn md5(&self) -> [u8; 16] {
        Md5::digest(&self.content).into()
    }

    /// SHA-256 of the content.
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        Sha256::digest(&self.content).into()
    }

    /// File type from the header mode.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn kind(&self) -> FileKind {
        FileKind::from_mode(self.header.mode as u32)
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the entry has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Checks the `070702` content checksum.
    ///
    /// Returns `None` for `070701` entries, which carry no checksum.
    #[must_use]
    pub fn crc_matches(&self) -> Option<bool> {
        match self.header.format {
            CpioFormat::NewAscii => None,
            CpioFormat::NewCrc => {
                let sum = self
                    .content
                    .iter()
                    .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
                Some(u64::from(sum) == self.header.checksum)
            }
        }
    }
}

/// Forward-only decoder over a decompressed archive stream.
///
/// The reader owns the stream. After the trailer, or after an error, every
/// further call returns `Ok(None)`.
///
/// # Examples
///
/// ```
/// use rpmkit_core::CpioReader;
/// use rpmkit_core::test_utils::CpioBuilder;
///
/// let archive = CpioBuilder::new().file("./hello.txt", 0o100_644, b"hi\n").build();
/// let mut reader = CpioReader::new(&archive[..]);
///
/// let entry = reader.next_entry()?.expect("one entry");
/// assert_eq!(entry.name, "./hello.txt");
/// assert_eq!(entry.content, b"hi\n");
/// assert!(reader.next_entry()?.is_none());
/// # Ok::<(), rpmkit_core::RpmError>(())
/// ```
pub struct CpioReader<R> {
    reader: CountingReader<R>,
    max_entry_size: u64,
    finished: bool,
}

impl<R: Read> CpioReader<R> {
    /// Creates a reader with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ReadConfig::default())
    }

    /// Creates a reader bounded by `config.max_entry_size`.
    pub fn with_config(reader: R, config: &ReadConfig) -> Self {
        Self {
            reader: CountingReader::new(reader),
            max_entry_size: config.max_entry_size,
            finished: false,
        }
    }

    /// Total bytes consumed from the stream so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.reader.total_bytes()
    }

    /// Returns `true` once the trailer or an error has been seen.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consumes the reader and returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Decodes the next entry, or `None` at the trailer.
    ///
    /// # Errors
    ///
    /// - [`RpmError::UnsupportedArchiveFormat`] for an unknown entry magic
    /// - [`RpmError::MalformedArchiveHeader`] for a non-hex field or an
    ///   unterminated name
    /// - [`RpmError::Truncated`] if the stream ends inside a header or name
    /// - [`RpmError::TruncatedContent`] if the content is shorter than declared
    /// - [`RpmError::LimitExceeded`] if the content exceeds `max_entry_size`
    pub fn next_entry(&mut self) -> Result<Option<CpioEntry>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.read_entry();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn read_entry(&mut self) -> Result<Option<CpioEntry>> {
        let offset = self.reader.total_bytes();

        let mut raw = [0u8; NEWC_HEADER_SIZE];
        read_exact_or_truncated(&mut self.reader, &mut raw, "archive entry header")?;

        let magic = &raw[..MAGIC_LEN];
        let format =
            CpioFormat::from_magic(magic).ok_or_else(|| RpmError::UnsupportedArchiveFormat {
                magic: String::from_utf8_lossy(magic).into_owned(),
            })?;
        let header = CpioHeader::parse(format, &raw[MAGIC_LEN..], offset)?;

        let raw_name = self.read_name(offset)?;
        if raw_name == TRAILER_NAME.as_bytes() {
            debug!("archive trailer at offset {offset}");
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&raw_name).into_owned();
        trace!(
            "archive entry '{name}' at offset {offset}, {} bytes",
            header.filesize
        );

        let name_padding = padding_to((NEWC_HEADER_SIZE + raw_name.len() + 1) as u64, 4);
        skip_bytes(&mut self.reader, name_padding, "archive name padding")?;

        if header.filesize > self.max_entry_size {
            return Err(RpmError::LimitExceeded {
                resource: "archive entry size",
                actual: header.filesize,
                max: self.max_entry_size,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let mut content = Vec::with_capacity(header.filesize.min(1 << 20) as usize);
        (&mut self.reader)
            .take(header.filesize)
            .read_to_end(&mut content)?;
        if (content.len() as u64) < header.filesize {
            return Err(RpmError::TruncatedContent {
                name,
                expected: header.filesize,
                actual: content.len() as u64,
            });
        }

        skip_bytes(
            &mut self.reader,
            padding_to(header.filesize, 4),
            "archive content padding",
        )?;

        Ok(Some(CpioEntry {
            header,
            name,
            content,
            offset,
        }))
    }

    /// Reads the NUL-terminated name, returning its raw bytes without the NUL.
    fn read_name(&mut self, offset: u64) -> Result<Vec<u8>> {
        let mut name = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            read_exact_or_truncated(&mut self.reader, &mut byte, "archive entry name")?;
            if byte[0] == 0 {
                break;
            }
            if name.len() == MAX_NAME_LEN {
                return Err(RpmError::MalformedArchiveHeader {
                    offset,
                    reason: format!("name exceeds {MAX_NAME_LEN} bytes without terminator"),
                });
            }
            name.push(byte[0]);
        }
        Ok(name)
    }
}

impl<R: Read> Iterator for CpioReader<R> {
    type Item = Result<CpioEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for CpioReader<R> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::test_utils::CpioBuilder;

    #[test]
    fn test_hello_entry() {
        let archive = CpioBuilder::new()
            .entry("./hello.txt", 0o100_644, 1_700_000_000, b"hello\n")
            .build();
        let mut reader = CpioReader::new(&archive[..]);
        let entry = reader.next_entry().unwrap().unwrap();

        assert_eq!(entry.name, "./hello.txt");
        assert_eq!(entry.header.filesize, 6);
        assert_eq!(entry.header.mode, 0o100_644);
        assert_eq!(entry.header.mtime, 1_700_000_000);
        assert_eq!(entry.header.namesize, 12);
        assert_eq!(entry.content, b"hello\n");
        assert_eq!(entry.offset, 0);
        assert_eq!(entry.kind(), FileKind::Regular);
        assert_eq!(
            hex::encode(entry.md5()),
            "b1946ac92492d2347c6235b4d2611184"
        );

        // 110 + 12 = 122 -> 124, 6 -> 8
        assert_eq!(reader.bytes_consumed(), 132);
        assert!(reader.next_entry().unwrap().is_none());
        assert!(reader.is_finished());
    }

    #[test]
    fn test_trailer_only() {
        let archive = CpioBuilder::new().build();
        let mut reader = CpioReader::new(&archive[..]);
        assert!(reader.next_entry().unwrap().is_none());
        assert!(reader.next_entry().unwrap().is_none());
        assert_eq!(reader.bytes_consumed(), 121);
    }

    #[test]
    fn test_offsets_increase() {
        let archive = CpioBuilder::new()
            .file("./a", 0o100_644, b"1")
            .file("./bb", 0o100_644, b"")
            .file("./ccc", 0o100_755, b"12345")
            .build();
        let entries: Vec<_> = CpioReader::new(&archive[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.windows(2).all(|w| w[0].offset < w[1].offset));
        assert_eq!(entries[1].offset % 4, 0);
    }

    #[test]
    fn test_unsupported_magic() {
        let mut archive = CpioBuilder::new().file("./a", 0o100_644, b"x").build();
        archive[..6].copy_from_slice(b"070707");
        let mut reader = CpioReader::new(&archive[..]);
        assert!(matches!(
            reader.next_entry(),
            Err(RpmError::UnsupportedArchiveFormat { magic }) if magic == "070707"
        ));
        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_non_hex_field() {
        let mut archive = CpioBuilder::new().file("./a", 0o100_644, b"x").build();
        // first byte of the mode field
        archive[14] = b'z';
        let err = CpioReader::new(&archive[..]).next_entry().unwrap_err();
        assert!(matches!(
            err,
            RpmError::MalformedArchiveHeader { offset: 0, ref reason } if reason.contains("mode")
        ));
    }

    #[test]
    fn test_non_utf8_name_keeps_alignment() {
        let mut archive = CpioBuilder::new()
            .file("./x", 0o100_644, b"hi\n")
            .file("./next", 0o100_644, b"second")
            .build();
        // 110 + "./\xff\0" 4 = 114, padded by 2
        archive[NEWC_HEADER_SIZE + 2] = 0xFF;
        let mut reader = CpioReader::new(&archive[..]);

        let entry = reader.next_entry().unwrap().unwrap();
        assert_eq!(entry.name, "./\u{FFFD}");
        assert_eq!(entry.content, b"hi\n");

        let next = reader.next_entry().unwrap().unwrap();
        assert_eq!(next.name, "./next");
        assert_eq!(next.content, b"second");
        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_signed_hex_rejected() {
        assert_eq!(parse_hex(b"0000000A"), Some(10));
        assert_eq!(parse_hex(b"ffffffff"), Some(0xFFFF_FFFF));
        assert_eq!(parse_hex(b"+0000001"), None);
        assert_eq!(parse_hex(b"0000 001"), None);
    }

    #[test]
    fn test_truncated_content() {
        let archive = CpioBuilder::new()
            .file("./big", 0o100_644, &[7u8; 100])
            .build();
        // header 110 + "./big\0" 6 = 116, aligned; keep 40 content bytes
        let cut = &archive[..156];
        let err = CpioReader::new(cut).next_entry().unwrap_err();
        assert!(matches!(
            err,
            RpmError::TruncatedContent {
                expected: 100,
                actual: 40,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_header() {
        let archive = CpioBuilder::new().build();
        let err = CpioReader::new(&archive[..50]).next_entry().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn test_unterminated_name() {
        let mut archive = CpioBuilder::new().build();
        archive.truncate(NEWC_HEADER_SIZE);
        archive.extend(std::iter::repeat_n(b'a', MAX_NAME_LEN + 10));
        let err = CpioReader::new(&archive[..]).next_entry().unwrap_err();
        assert!(matches!(err, RpmError::MalformedArchiveHeader { .. }));
    }

    #[test]
    fn test_entry_size_limit() {
        let archive = CpioBuilder::new().file("./a", 0o100_644, &[0; 64]).build();
        let config = ReadConfig {
            max_entry_size: 16,
            ..Default::default()
        };
        let err = CpioReader::with_config(&archive[..], &config)
            .next_entry()
            .unwrap_err();
        assert!(matches!(
            err,
            RpmError::LimitExceeded {
                actual: 64,
                max: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_crc_format() {
        let archive = CpioBuilder::new()
            .crc()
            .file("./a", 0o100_644, &[1, 2, 3, 250])
            .build();
        let entry = CpioReader::new(&archive[..]).next_entry().unwrap().unwrap();
        assert_eq!(entry.header.format, CpioFormat::NewCrc);
        assert_eq!(entry.header.checksum, 256);
        assert_eq!(entry.crc_matches(), Some(true));

        let plain = CpioBuilder::new().file("./a", 0o100_644, b"x").build();
        let entry = CpioReader::new(&plain[..]).next_entry().unwrap().unwrap();
        assert_eq!(entry.crc_matches(), None);
    }

    #[test]
    fn test_sha256() {
        let archive = CpioBuilder::new().file("./e", 0o100_644, b"").build();
        let entry = CpioReader::new(&archive[..]).next_entry().unwrap().unwrap();
        assert_eq!(
            hex::encode(entry.sha256()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(entry.is_empty());
    }

    #[test]
    fn test_iterator_fused_after_error() {
        let mut archive = CpioBuilder::new().file("./a", 0o100_644, b"x").build();
        archive[0] = b'X';
        let mut reader = CpioReader::new(&archive[..]);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
