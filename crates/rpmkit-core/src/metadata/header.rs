//! Typed view over the metadata section.

use std::time::SystemTime;

use log::debug;

use super::ChangelogEntry;
use super::FileFlags;
use super::FileRecord;
use super::changelog;
use super::files;
use super::tags::REQUIRED_HEADER_TAGS;
use super::tags::tag;
use super::unix_time;
use crate::Result;
use crate::section::OptionalTag;
use crate::section::Section;
use crate::section::validate_required;

/// Package and per-file metadata, read by tag number.
///
/// Construction checks the required tags, so the accessors for them only
/// fail when the tag carries an unexpected type or a damaged span.
///
/// # Examples
///
/// ```
/// use rpmkit_core::MetadataView;
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::section::decode;
/// use rpmkit_core::test_utils::PackageBuilder;
///
/// let bytes = PackageBuilder::new("hello", "1.0", "1").header_bytes();
/// let section = decode(&mut &bytes[..], &ReadConfig::default())?;
/// let view = MetadataView::new(section)?;
/// assert_eq!(view.nevra()?, "hello-1.0-1.x86_64");
/// # Ok::<(), rpmkit_core::RpmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MetadataView {
    section: Section,
}

impl MetadataView {
    /// Wraps a metadata section after checking its required tags.
    ///
    /// # Errors
    ///
    /// Returns [`RpmError::MissingRequiredTag`](crate::RpmError::MissingRequiredTag)
    /// naming the first absent required tag.
    pub fn new(section: Section) -> Result<Self> {
        validate_required(&section, REQUIRED_HEADER_TAGS)?;
        Ok(Self { section })
    }

    /// Returns the underlying section.
    #[must_use]
    pub const fn section(&self) -> &Section {
        &self.section
    }

    /// Package name.
    pub fn name(&self) -> Result<String> {
        self.section.get_string(tag::NAME)
    }

    /// Upstream version.
    pub fn version(&self) -> Result<String> {
        self.section.get_string(tag::VERSION)
    }

    /// Package release.
    pub fn release(&self) -> Result<String> {
        self.section.get_string(tag::RELEASE)
    }

    /// Epoch, if the package sets one.
    pub fn epoch(&self) -> Result<Option<u32>> {
        Ok(self
            .section
            .get_int32(tag::EPOCH)
            .optional()?
            .map(i32::cast_unsigned))
    }

    /// One-line summary.
    pub fn summary(&self) -> Result<String> {
        self.section.get_string(tag::SUMMARY)
    }

    /// Long description.
    pub fn description(&self) -> Result<String> {
        self.section.get_string(tag::DESCRIPTION)
    }

    /// Build timestamp.
    pub fn build_time(&self) -> Result<Option<SystemTime>> {
        Ok(self
            .section
            .get_int32(tag::BUILD_TIME)
            .optional()?
            .map(unix_time))
    }

    /// Build host name.
    pub fn build_host(&self) -> Result<Option<String>> {
        self.section.get_string(tag::BUILD_HOST).optional()
    }

    /// Total installed size in bytes.
    pub fn size(&self) -> Result<u32> {
        Ok(self.section.get_int32(tag::SIZE)?.cast_unsigned())
    }

    /// Distribution name.
    pub fn distribution(&self) -> Result<Option<String>> {
        self.section.get_string(tag::DISTRIBUTION).optional()
    }

    /// Vendor name.
    pub fn vendor(&self) -> Result<Option<String>> {
        self.section.get_string(tag::VENDOR).optional()
    }

    /// License string.
    pub fn license(&self) -> Result<String> {
        self.section.get_string(tag::LICENSE)
    }

    /// Packager name.
    pub fn packager(&self) -> Result<Option<String>> {
        self.section.get_string(tag::PACKAGER).optional()
    }

    /// Package group.
    pub fn group(&self) -> Result<String> {
        self.section.get_string(tag::GROUP)
    }

    /// Upstream URL.
    pub fn url(&self) -> Result<Option<String>> {
        self.section.get_string(tag::URL).optional()
    }

    /// Target operating system.
    pub fn os(&self) -> Result<String> {
        self.section.get_string(tag::OS)
    }

    /// Target architecture.
    pub fn arch(&self) -> Result<String> {
        self.section.get_string(tag::ARCH)
    }

    /// Name of the source package this was built from.
    pub fn source_rpm(&self) -> Result<Option<String>> {
        self.section.get_string(tag::SOURCE_RPM).optional()
    }

    /// Uncompressed archive size.
    pub fn archive_size(&self) -> Result<Option<u32>> {
        Ok(self
            .section
            .get_int32(tag::ARCHIVE_SIZE)
            .optional()?
            .map(i32::cast_unsigned))
    }

    /// Archive format of the payload, normally `cpio`.
    pub fn payload_format(&self) -> Result<String> {
        self.section.get_string(tag::PAYLOAD_FORMAT)
    }

    /// Compressor name of the payload.
    pub fn payload_compressor(&self) -> Result<String> {
        self.section.get_string(tag::PAYLOAD_COMPRESSOR)
    }

    /// Compressor flags, usually the compression level.
    pub fn payload_flags(&self) -> Result<String> {
        self.section.get_string(tag::PAYLOAD_FLAGS)
    }

    /// `name-[epoch:]version-release.arch`.
    pub fn nevra(&self) -> Result<String> {
        let epoch = self
            .epoch()?
            .map(|e| format!("{e}:"))
            .unwrap_or_default();
        Ok(format!(
            "{}-{epoch}{}-{}.{}",
            self.name()?,
            self.version()?,
            self.release()?,
            self.arch()?
        ))
    }

    /// Absolute paths of every packaged file, in package order.
    ///
    /// # Errors
    ///
    /// Fails with [`RpmError::FileListMismatch`](crate::RpmError::FileListMismatch)
    /// if `dirindexes` and `basenames` differ in length, or
    /// [`RpmError::InvalidDirIndex`](crate::RpmError::InvalidDirIndex) for an
    /// index outside `dirnames`.
    pub fn file_names(&self) -> Result<Vec<String>> {
        files::file_names(&self.section)
    }

    /// Per-file records, in package order.
    ///
    /// # Errors
    ///
    /// Fails with [`RpmError::FileListMismatch`](crate::RpmError::FileListMismatch)
    /// when the parallel file arrays have unequal lengths.
    pub fn files(&self) -> Result<Vec<FileRecord>> {
        let records = files::file_records(&self.section)?;
        debug!("metadata declares {} files", records.len());
        Ok(records)
    }

    /// Records whose flags contain any of `flags`.
    pub fn files_with_flag(&self, flags: FileFlags) -> Result<Vec<FileRecord>> {
        Ok(self
            .files()?
            .into_iter()
            .filter(|f| f.flags.intersects(flags))
            .collect())
    }

    /// Changelog entries in package order.
    pub fn changelog(&self) -> Result<Vec<ChangelogEntry>> {
        changelog::changelog(&self.section)
    }
}
