//! Per-file records assembled from the parallel file arrays.

use std::path::Path;

use super::FileFlags;
use super::tags::tag;
use crate::Result;
use crate::RpmError;
use crate::section::OptionalTag;
use crate::section::Section;
use crate::types::FileKind;

/// Everything the metadata section declares about one packaged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute install path.
    pub path: String,
    /// Declared size in bytes.
    pub size: u32,
    /// Declared mode, type bits included.
    pub mode: u16,
    /// Declared modification time, seconds since the epoch.
    pub mtime: u32,
    /// Hex-encoded content digest; empty for files without content.
    pub digest_hex: String,
    /// Attribute bits.
    pub flags: FileFlags,
    /// Device number of the build host file system.
    pub device: u32,
    /// Device number for device files.
    pub rdevice: u16,
    /// Symlink target; empty for non-links.
    pub link_to: String,
    /// Owner name, if the package records owners.
    pub user: Option<String>,
    /// Group name, if the package records groups.
    pub group: Option<String>,
    /// Inode number on the build host, if recorded.
    pub inode: Option<u32>,
    /// Language tag, if recorded.
    pub lang: Option<String>,
}

impl FileRecord {
    /// Returns the file type from the declared mode.
    #[must_use]
    pub fn kind(&self) -> FileKind {
        FileKind::from_mode(u32::from(self.mode))
    }

    /// Returns the digest string, or `None` when the package records none.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        if self.digest_hex.is_empty() {
            None
        } else {
            Some(&self.digest_hex)
        }
    }

    /// Returns the path as a [`Path`].
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

/// Resolves file paths from the split or the flat name encoding.
///
/// Split names (`basenames` + `dirnames` + `dirindexes`) win when all three
/// tags are present. A section with neither encoding has no files.
pub(crate) fn file_names(section: &Section) -> Result<Vec<String>> {
    if section.has(tag::BASENAMES) && section.has(tag::DIRNAMES) && section.has(tag::DIR_INDEXES)
    {
        let basenames = section.get_string_array(tag::BASENAMES)?;
        let dirnames = section.get_string_array(tag::DIRNAMES)?;
        let dirindexes = section.get_int32_array(tag::DIR_INDEXES)?;

        check_len("dirindexes", basenames.len(), dirindexes.len())?;

        basenames
            .iter()
            .zip(&dirindexes)
            .map(|(base, &index)| {
                usize::try_from(index)
                    .ok()
                    .and_then(|i| dirnames.get(i))
                    .map(|dir| format!("{dir}{base}"))
                    .ok_or(RpmError::InvalidDirIndex {
                        index,
                        dirs: dirnames.len(),
                    })
            })
            .collect()
    } else if section.has(tag::OLD_FILENAMES) {
        section.get_string_array(tag::OLD_FILENAMES)
    } else {
        Ok(Vec::new())
    }
}

/// Zips the parallel file arrays into records.
pub(crate) fn file_records(section: &Section) -> Result<Vec<FileRecord>> {
    let paths = file_names(section)?;
    if paths.is_empty() {
        return Ok(Vec::new());
    }
    let n = paths.len();

    let sizes = section.get_int32_array(tag::FILE_SIZES)?;
    check_len("sizes", n, sizes.len())?;
    let modes = section.get_int16_array(tag::FILE_MODES)?;
    check_len("modes", n, modes.len())?;
    let mtimes = section.get_int32_array(tag::FILE_MTIMES)?;
    check_len("mtimes", n, mtimes.len())?;
    let digests = section.get_string_array(tag::FILE_DIGESTS)?;
    check_len("digests", n, digests.len())?;
    let devices = section.get_int32_array(tag::FILE_DEVICES)?;
    check_len("devices", n, devices.len())?;
    let rdevs = section.get_int16_array(tag::FILE_RDEVS)?;
    check_len("rdevs", n, rdevs.len())?;
    let linktos = section.get_string_array(tag::FILE_LINKTOS)?;
    check_len("link targets", n, linktos.len())?;
    let flags = section.get_int32_array(tag::FILE_FLAGS)?;
    check_len("flags", n, flags.len())?;

    let users = optional_array(section.get_string_array(tag::FILE_USERNAME), "users", n)?;
    let groups = optional_array(section.get_string_array(tag::FILE_GROUPNAME), "groups", n)?;
    let inodes = optional_array(section.get_int32_array(tag::FILE_INODES), "inodes", n)?;
    let langs = optional_array(section.get_string_array(tag::FILE_LANGS), "langs", n)?;

    let mut digests = digests.into_iter();
    let mut linktos = linktos.into_iter();
    let records = paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| FileRecord {
            path,
            size: sizes[i].cast_unsigned(),
            mode: modes[i].cast_unsigned(),
            mtime: mtimes[i].cast_unsigned(),
            digest_hex: digests.next().unwrap_or_default(),
            flags: FileFlags::from_bits_truncate(flags[i].cast_unsigned()),
            device: devices[i].cast_unsigned(),
            rdevice: rdevs[i].cast_unsigned(),
            link_to: linktos.next().unwrap_or_default(),
            user: users.as_ref().map(|v| v[i].clone()),
            group: groups.as_ref().map(|v| v[i].clone()),
            inode: inodes.as_ref().map(|v| v[i].cast_unsigned()),
            lang: langs.as_ref().map(|v| v[i].clone()),
        })
        .collect();
    Ok(records)
}

fn optional_array<T>(
    lookup: Result<Vec<T>>,
    field: &'static str,
    expected: usize,
) -> Result<Option<Vec<T>>> {
    let values = lookup.optional()?;
    if let Some(values) = &values {
        check_len(field, expected, values.len())?;
    }
    Ok(values)
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(RpmError::FileListMismatch {
            field,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ReadConfig;
    use crate::section::decode;
    use crate::test_utils::SectionBuilder;

    fn decode_section(builder: SectionBuilder) -> Section {
        let bytes = builder.build();
        decode(&mut &bytes[..], &ReadConfig::default()).unwrap()
    }

    fn file_arrays(builder: SectionBuilder, n: usize) -> SectionBuilder {
        let digests = vec![""; n];
        builder
            .int32(tag::FILE_SIZES, &vec![0; n])
            .int16(tag::FILE_MODES, &vec![0o644; n])
            .int32(tag::FILE_MTIMES, &vec![0; n])
            .string_array(tag::FILE_DIGESTS, &digests)
            .int32(tag::FILE_DEVICES, &vec![1; n])
            .int16(tag::FILE_RDEVS, &vec![0; n])
            .string_array(tag::FILE_LINKTOS, &digests)
            .int32(tag::FILE_FLAGS, &vec![0; n])
    }

    #[test]
    fn test_split_names() {
        let section = decode_section(
            SectionBuilder::new()
                .string_array(tag::BASENAMES, &["bin", "hello.txt", "ls"])
                .string_array(tag::DIRNAMES, &["/usr/", "/usr/share/", "/usr/bin/"])
                .int32(tag::DIR_INDEXES, &[0, 1, 2]),
        );
        assert_eq!(
            file_names(&section).unwrap(),
            vec!["/usr/bin", "/usr/share/hello.txt", "/usr/bin/ls"]
        );
    }

    #[test]
    fn test_flat_names() {
        let section = decode_section(
            SectionBuilder::new().string_array(tag::OLD_FILENAMES, &["/etc/a", "/etc/b"]),
        );
        assert_eq!(file_names(&section).unwrap(), vec!["/etc/a", "/etc/b"]);
    }

    #[test]
    fn test_no_file_tags() {
        let section = decode_section(SectionBuilder::new().string(tag::NAME, "empty"));
        assert!(file_names(&section).unwrap().is_empty());
        assert!(file_records(&section).unwrap().is_empty());
    }

    #[test]
    fn test_dir_index_out_of_range() {
        let section = decode_section(
            SectionBuilder::new()
                .string_array(tag::BASENAMES, &["a"])
                .string_array(tag::DIRNAMES, &["/"])
                .int32(tag::DIR_INDEXES, &[3]),
        );
        assert!(matches!(
            file_names(&section),
            Err(RpmError::InvalidDirIndex { index: 3, dirs: 1 })
        ));
    }

    #[test]
    fn test_negative_dir_index() {
        let section = decode_section(
            SectionBuilder::new()
                .string_array(tag::BASENAMES, &["a"])
                .string_array(tag::DIRNAMES, &["/"])
                .int32(tag::DIR_INDEXES, &[-1]),
        );
        assert!(matches!(
            file_names(&section),
            Err(RpmError::InvalidDirIndex { index: -1, .. })
        ));
    }

    #[test]
    fn test_records_from_arrays() {
        let builder = SectionBuilder::new().string_array(tag::OLD_FILENAMES, &["/a", "/b"]);
        let section = decode_section(file_arrays(builder, 2).string_array(
            tag::FILE_USERNAME,
            &["root", "nobody"],
        ));
        let records = file_records(&section).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].path, "/b");
        assert_eq!(records[1].user.as_deref(), Some("nobody"));
        assert_eq!(records[0].group, None);
        assert_eq!(records[0].digest(), None);
        assert_eq!(records[0].device, 1);
    }

    #[test]
    fn test_unequal_arrays() {
        let section = decode_section(
            SectionBuilder::new()
                .string_array(tag::OLD_FILENAMES, &["/a", "/b", "/c"])
                .int32(tag::FILE_SIZES, &[1, 2]),
        );
        assert!(matches!(
            file_records(&section),
            Err(RpmError::FileListMismatch {
                field: "sizes",
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_optional_array_length_checked() {
        let builder = SectionBuilder::new().string_array(tag::OLD_FILENAMES, &["/a", "/b"]);
        let section = decode_section(file_arrays(builder, 2).string_array(tag::FILE_LANGS, &[""]));
        assert!(matches!(
            file_records(&section),
            Err(RpmError::FileListMismatch { field: "langs", .. })
        ));
    }

    #[test]
    fn test_record_kind() {
        let record = FileRecord {
            path: "/usr/bin".into(),
            size: 0,
            mode: 0o040_755,
            mtime: 0,
            digest_hex: String::new(),
            flags: FileFlags::empty(),
            device: 0,
            rdevice: 0,
            link_to: String::new(),
            user: None,
            group: None,
            inode: None,
            lang: None,
        };
        assert_eq!(record.kind(), FileKind::Directory);
        assert_eq!(record.as_path(), Path::new("/usr/bin"));
    }
}
