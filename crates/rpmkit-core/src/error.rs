//! Error types for package decoding and verification.

use thiserror::Error;

use crate::section::ValueType;

/// Result type alias using `RpmError`.
pub type Result<T> = std::result::Result<T, RpmError>;

/// Broad category of an [`RpmError`].
///
/// Every error is terminal for the operation that raised it; the category
/// only tells the caller what kind of damage the package has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad magic, unsupported variant or undecodable field.
    Format,
    /// The stream ended before an expected field.
    Truncation,
    /// A descriptor span exceeds its store.
    Bounds,
    /// A required tag is absent or file-list arrays disagree.
    MissingField,
    /// Metadata file count and archive entry count disagree.
    CountMismatch,
    /// The payload compressor is unknown.
    UnsupportedCompressor,
    /// A declared size exceeds a configured limit.
    Limit,
    /// Underlying I/O failure.
    Io,
}

/// Errors that can occur while reading or verifying a package.
#[derive(Error, Debug)]
pub enum RpmError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a field was complete.
    #[error("truncated input: stream ended while reading {what} ({expected} bytes expected)")]
    Truncated {
        /// The structure being read.
        what: &'static str,
        /// Number of bytes the structure needs.
        expected: u64,
    },

    /// The lead does not start with the package magic.
    #[error("invalid lead magic: {found:02x?}")]
    BadLeadMagic {
        /// The four bytes found instead.
        found: [u8; 4],
    },

    /// The lead declares a format version other than 3.0.
    #[error("unsupported package format version {major}.{minor}")]
    UnsupportedVersion {
        /// Declared major version.
        major: u8,
        /// Declared minor version.
        minor: u8,
    },

    /// A section does not start with the section magic.
    #[error("invalid section magic: {found:02x?}")]
    BadMagic {
        /// The three bytes found instead.
        found: [u8; 3],
    },

    /// A descriptor carries a type code outside the known range.
    #[error("unknown value type {code} for tag {tag}")]
    UnknownValueType {
        /// Tag of the offending descriptor.
        tag: i32,
        /// Raw type code.
        code: u32,
    },

    /// A descriptor span does not fit inside the section store.
    #[error(
        "malformed section: tag {tag} at offset {offset} needs {needed} bytes but store is {store_size} bytes"
    )]
    MalformedSection {
        /// Tag of the offending descriptor.
        tag: i32,
        /// Start offset of the span.
        offset: u64,
        /// Bytes the span needs from `offset` (for strings, what was scanned).
        needed: u64,
        /// Size of the store.
        store_size: u64,
    },

    /// No descriptor matches the requested tag.
    #[error("tag {0} not found")]
    TagNotFound(i32),

    /// The descriptor type is incompatible with the requested accessor.
    #[error("tag {tag} has type {actual}, expected {expected}")]
    TypeMismatch {
        /// Requested tag.
        tag: i32,
        /// Types the accessor accepts.
        expected: &'static str,
        /// Type found in the descriptor.
        actual: ValueType,
    },

    /// The descriptor type is recognized but cannot be decoded.
    #[error("tag {tag} has unsupported value type {value_type}")]
    UnsupportedValueType {
        /// Requested tag.
        tag: i32,
        /// The unsupported type.
        value_type: ValueType,
    },

    /// A tag that every metadata section must carry is absent.
    #[error("required tag {0} is missing")]
    MissingRequiredTag(i32),

    /// Parallel file-list arrays have different lengths.
    #[error("file list arrays disagree: {field} has {actual} entries, expected {expected}")]
    FileListMismatch {
        /// The array whose length disagrees.
        field: &'static str,
        /// Number of file names.
        expected: usize,
        /// Length of `field`.
        actual: usize,
    },

    /// A directory index points past the directory name list.
    #[error("directory index {index} out of range ({dirs} directories)")]
    InvalidDirIndex {
        /// The offending index.
        index: i32,
        /// Number of directory names.
        dirs: usize,
    },

    /// The archive entry magic is not a supported cpio variant.
    #[error("unsupported archive format: magic {magic:?}")]
    UnsupportedArchiveFormat {
        /// The magic found, lossily decoded.
        magic: String,
    },

    /// An archive entry header field cannot be decoded.
    #[error("malformed archive header at offset {offset}: {reason}")]
    MalformedArchiveHeader {
        /// Stream offset of the entry.
        offset: u64,
        /// What is wrong with it.
        reason: String,
    },

    /// An archive entry's content ended early.
    #[error("truncated content for '{name}': expected {expected} bytes, got {actual}")]
    TruncatedContent {
        /// Entry name.
        name: String,
        /// Declared size.
        expected: u64,
        /// Bytes actually available.
        actual: u64,
    },

    /// A file digest string is not valid hexadecimal.
    #[error("invalid digest for '{path}': {reason}")]
    InvalidDigest {
        /// File the digest belongs to.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Metadata and archive disagree on the number of files.
    #[error("file count mismatch: metadata declares {declared} files, archive contains {archived}")]
    CountMismatch {
        /// Files with nonzero size in the metadata.
        declared: usize,
        /// Entries decoded from the archive, trailer excluded.
        archived: usize,
    },

    /// The payload compressor name is not supported.
    #[error("unsupported payload compressor '{0}'")]
    UnsupportedCompressor(String),

    /// A declared size exceeds the configured limit.
    #[error("{resource} limit exceeded ({actual} > {max})")]
    LimitExceeded {
        /// What was being sized.
        resource: &'static str,
        /// Declared or observed size.
        actual: u64,
        /// Configured maximum.
        max: u64,
    },
}

impl RpmError {
    /// Returns the broad category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rpmkit_core::ErrorKind;
    /// use rpmkit_core::RpmError;
    ///
    /// let err = RpmError::BadMagic { found: [0, 0, 0] };
    /// assert_eq!(err.kind(), ErrorKind::Format);
    ///
    /// let err = RpmError::CountMismatch { declared: 3, archived: 2 };
    /// assert_eq!(err.kind(), ErrorKind::CountMismatch);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Truncated { .. } | Self::TruncatedContent { .. } => ErrorKind::Truncation,
            Self::BadLeadMagic { .. }
            | Self::UnsupportedVersion { .. }
            | Self::BadMagic { .. }
            | Self::UnknownValueType { .. }
            | Self::TypeMismatch { .. }
            | Self::UnsupportedValueType { .. }
            | Self::UnsupportedArchiveFormat { .. }
            | Self::MalformedArchiveHeader { .. }
            | Self::InvalidDigest { .. } => ErrorKind::Format,
            Self::MalformedSection { .. } => ErrorKind::Bounds,
            Self::TagNotFound(_)
            | Self::MissingRequiredTag(_)
            | Self::FileListMismatch { .. }
            | Self::InvalidDirIndex { .. } => ErrorKind::MissingField,
            Self::CountMismatch { .. } => ErrorKind::CountMismatch,
            Self::UnsupportedCompressor(_) => ErrorKind::UnsupportedCompressor,
            Self::LimitExceeded { .. } => ErrorKind::Limit,
        }
    }

    /// Returns `true` if the package itself is damaged or unsupported.
    ///
    /// I/O failures of the underlying source are not corruption.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Io)
    }

    /// Returns the tag number this error is about, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rpmkit_core::RpmError;
    ///
    /// assert_eq!(RpmError::MissingRequiredTag(1000).tag(), Some(1000));
    /// assert_eq!(RpmError::UnsupportedCompressor("lz4".into()).tag(), None);
    /// ```
    #[must_use]
    pub const fn tag(&self) -> Option<i32> {
        match self {
            Self::UnknownValueType { tag, .. }
            | Self::MalformedSection { tag, .. }
            | Self::TypeMismatch { tag, .. }
            | Self::UnsupportedValueType { tag, .. } => Some(*tag),
            Self::TagNotFound(tag) | Self::MissingRequiredTag(tag) => Some(*tag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RpmError::UnsupportedCompressor("lz4".into());
        assert_eq!(err.to_string(), "unsupported payload compressor 'lz4'");
    }

    #[test]
    fn test_malformed_section_display() {
        let err = RpmError::MalformedSection {
            tag: 1000,
            offset: 60,
            needed: 8,
            store_size: 64,
        };
        let display = err.to_string();
        assert!(display.contains("tag 1000"));
        assert!(display.contains("offset 60"));
        assert!(display.contains("64 bytes"));
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_count_mismatch_display() {
        let err = RpmError::CountMismatch {
            declared: 3,
            archived: 2,
        };
        assert!(err.to_string().contains("declares 3"));
        assert!(err.to_string().contains("contains 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RpmError = io_err.into();
        assert!(matches!(err, RpmError::Io(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(
            RpmError::Truncated {
                what: "lead",
                expected: 96
            }
            .kind(),
            ErrorKind::Truncation
        );
        assert_eq!(
            RpmError::UnsupportedArchiveFormat {
                magic: "070707".into()
            }
            .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            RpmError::FileListMismatch {
                field: "sizes",
                expected: 3,
                actual: 2
            }
            .kind(),
            ErrorKind::MissingField
        );
        assert_eq!(
            RpmError::LimitExceeded {
                resource: "store",
                actual: 10,
                max: 5
            }
            .kind(),
            ErrorKind::Limit
        );
        assert!(RpmError::TagNotFound(1).is_corruption());
    }

    #[test]
    fn test_tag_accessor() {
        let err = RpmError::TypeMismatch {
            tag: 1028,
            expected: "int32",
            actual: ValueType::StringZ,
        };
        assert_eq!(err.tag(), Some(1028));
        assert!(err.to_string().contains("string"));

        let err = RpmError::CountMismatch {
            declared: 1,
            archived: 0,
        };
        assert_eq!(err.tag(), None);
    }
}
