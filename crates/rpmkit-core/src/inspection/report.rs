//! Verification results.

use std::fmt;

use crate::metadata::FileFlags;

/// Digest algorithm, inferred from the decoded digest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// 16-byte digests.
    Md5,
    /// 32-byte digests.
    Sha256,
}

impl DigestAlgorithm {
    /// Infers the algorithm from a decoded digest length.
    ///
    /// Packages do not always record which algorithm produced the file
    /// digests, so the length is the only reliable signal.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Md5),
            32 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared value and the value found in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMismatch<T> {
    /// Value from the metadata section.
    pub expected: T,
    /// Value from the archive.
    pub actual: T,
}

impl<T: PartialEq> FieldMismatch<T> {
    /// Returns a mismatch if the values differ.
    pub fn compare(expected: T, actual: T) -> Option<Self> {
        (expected != actual).then_some(Self { expected, actual })
    }
}

/// Digest values that disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    /// Algorithm used for both sides.
    pub algorithm: DigestAlgorithm,
    /// Declared digest, hex.
    pub expected: String,
    /// Digest of the archived content, hex.
    pub actual: String,
}

/// Outcome of the content digest comparison for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestStatus {
    /// The metadata records no digest for this file.
    Absent,
    /// Digests agree.
    Match(DigestAlgorithm),
    /// Digests disagree.
    Mismatch(DigestMismatch),
    /// The declared digest length matches no known algorithm.
    Unverifiable {
        /// Length of the decoded digest in bytes.
        decoded_len: usize,
    },
}

/// Field-by-field comparison of one metadata record with one archive entry.
///
/// Fields without a mismatch are `None`; every field is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// Path from the metadata section.
    pub path: String,
    /// Name of the archive entry it was paired with.
    pub archived_path: String,
    /// Declared file flags.
    pub flags: FileFlags,
    /// Size mismatch, checked only for entries with content.
    pub size_error: Option<FieldMismatch<u64>>,
    /// Mode mismatch over the low 16 bits.
    pub mode_error: Option<FieldMismatch<u32>>,
    /// Digest comparison outcome.
    pub digest: DigestStatus,
    /// Modification time mismatch.
    pub mtime_error: Option<FieldMismatch<u64>>,
}

impl VerifyResult {
    /// Returns the digest mismatch, if any.
    #[must_use]
    pub const fn digest_error(&self) -> Option<&DigestMismatch> {
        match &self.digest {
            DigestStatus::Mismatch(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` if any field disagrees.
    #[must_use]
    pub const fn has_mismatch(&self) -> bool {
        self.size_error.is_some()
            || self.mode_error.is_some()
            || self.mtime_error.is_some()
            || self.digest_error().is_some()
    }

    /// Returns `true` if the digest could not be checked.
    #[must_use]
    pub const fn is_unverifiable(&self) -> bool {
        matches!(self.digest, DigestStatus::Unverifiable { .. })
    }

    /// Returns `true` if the metadata path names the archived entry.
    ///
    /// Archive names are relative (`./usr/bin/ls`) while metadata paths are
    /// absolute (`/usr/bin/ls`). Pairing is positional, so a `false` here
    /// means the two lists are ordered differently.
    #[must_use]
    pub fn paths_agree(&self) -> bool {
        let archived = self
            .archived_path
            .strip_prefix('.')
            .unwrap_or(&self.archived_path);
        archived.trim_start_matches('/') == self.path.trim_start_matches('/')
    }

    /// Four-column mismatch marker: `S` size, `M` mode, `5` digest, `T`
    /// mtime, `.` where the field agrees.
    #[must_use]
    pub fn flag_string(&self) -> String {
        [
            (self.size_error.is_some(), 'S'),
            (self.mode_error.is_some(), 'M'),
            (self.digest_error().is_some(), '5'),
            (self.mtime_error.is_some(), 'T'),
        ]
        .iter()
        .map(|&(bad, c)| if bad { c } else { '.' })
        .collect()
    }
}

/// Overall verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    /// Every checked field agrees.
    Pass,
    /// No mismatches, but some digests could not be checked.
    Warning,
    /// At least one field disagrees.
    Fail,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warning => write!(f, "WARNING"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Aggregated result of verifying a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Overall status.
    pub status: VerificationStatus,
    /// One result per paired file, in package order.
    pub results: Vec<VerifyResult>,
    /// Number of paired files.
    pub files_checked: usize,
    /// Number of files with at least one mismatch.
    pub mismatched_files: usize,
    /// Number of files whose digest could not be checked.
    pub unverifiable_digests: usize,
}

impl VerificationReport {
    /// Builds a report from per-file results.
    #[must_use]
    pub fn from_results(results: Vec<VerifyResult>) -> Self {
        let mismatched_files = results.iter().filter(|r| r.has_mismatch()).count();
        let unverifiable_digests = results.iter().filter(|r| r.is_unverifiable()).count();
        let status = if mismatched_files > 0 {
            VerificationStatus::Fail
        } else if unverifiable_digests > 0 {
            VerificationStatus::Warning
        } else {
            VerificationStatus::Pass
        };
        Self {
            status,
            files_checked: results.len(),
            mismatched_files,
            unverifiable_digests,
            results,
        }
    }

    /// Returns `true` if no field disagrees.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.status != VerificationStatus::Fail
    }

    /// Results with at least one mismatch.
    pub fn mismatches(&self) -> impl Iterator<Item = &VerifyResult> {
        self.results.iter().filter(|r| r.has_mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str, archived: &str) -> VerifyResult {
        VerifyResult {
            path: path.into(),
            archived_path: archived.into(),
            flags: FileFlags::empty(),
            size_error: None,
            mode_error: None,
            digest: DigestStatus::Match(DigestAlgorithm::Md5),
            mtime_error: None,
        }
    }

    #[test]
    fn test_from_len() {
        assert_eq!(DigestAlgorithm::from_len(16), Some(DigestAlgorithm::Md5));
        assert_eq!(DigestAlgorithm::from_len(32), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_len(20), None);
    }

    #[test]
    fn test_field_compare() {
        assert_eq!(FieldMismatch::compare(1u64, 1), None);
        assert_eq!(
            FieldMismatch::compare(4u64, 5),
            Some(FieldMismatch {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_paths_agree() {
        assert!(result("/usr/bin/ls", "./usr/bin/ls").paths_agree());
        assert!(result("/usr/bin/ls", "usr/bin/ls").paths_agree());
        assert!(result("/usr/bin/ls", "/usr/bin/ls").paths_agree());
        assert!(!result("/usr/bin/ls", "./usr/bin/cp").paths_agree());
    }

    #[test]
    fn test_flag_string() {
        let mut r = result("/a", "./a");
        assert_eq!(r.flag_string(), "....");
        r.size_error = FieldMismatch::compare(1, 2);
        r.mtime_error = FieldMismatch::compare(1, 2);
        assert_eq!(r.flag_string(), "S..T");
        r.digest = DigestStatus::Mismatch(DigestMismatch {
            algorithm: DigestAlgorithm::Md5,
            expected: "00".into(),
            actual: "11".into(),
        });
        assert_eq!(r.flag_string(), "S.5T");
    }

    #[test]
    fn test_report_status() {
        let clean = VerificationReport::from_results(vec![result("/a", "./a")]);
        assert_eq!(clean.status, VerificationStatus::Pass);
        assert!(clean.is_clean());

        let mut unverifiable = result("/b", "./b");
        unverifiable.digest = DigestStatus::Unverifiable { decoded_len: 20 };
        let warn = VerificationReport::from_results(vec![result("/a", "./a"), unverifiable]);
        assert_eq!(warn.status, VerificationStatus::Warning);
        assert_eq!(warn.unverifiable_digests, 1);
        assert!(warn.is_clean());

        let mut bad = result("/c", "./c");
        bad.mode_error = FieldMismatch::compare(0o644, 0o755);
        let fail = VerificationReport::from_results(vec![bad]);
        assert_eq!(fail.status, VerificationStatus::Fail);
        assert_eq!(fail.mismatches().count(), 1);
        assert!(!fail.is_clean());
    }
}
