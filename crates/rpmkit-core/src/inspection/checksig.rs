//! Digest-only signature checks.
//!
//! The signature section records the byte count and the MD5 of the
//! metadata section followed by the compressed payload. Both are
//! recomputed here; public-key signatures are only reported as present.

use std::fmt;

use md5::Digest;
use md5::Md5;

use crate::Result;
use crate::metadata::SignatureView;

/// Outcome of one signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The signature section has no such tag.
    Absent,
    /// The recorded value matches.
    Ok,
    /// The recorded value differs from the recomputed one.
    Mismatch {
        /// Recorded value.
        expected: String,
        /// Recomputed value.
        actual: String,
    },
}

impl CheckOutcome {
    fn compare(expected: String, actual: String) -> Self {
        if expected == actual {
            Self::Ok
        } else {
            Self::Mismatch { expected, actual }
        }
    }

    /// Returns `true` for [`CheckOutcome::Mismatch`].
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Ok => f.write_str("OK"),
            Self::Mismatch { expected, actual } => {
                write!(f, "BAD (expected {expected}, got {actual})")
            }
        }
    }
}

/// Result of checking a package against its signature section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureReport {
    /// Header-plus-payload byte count.
    pub size: CheckOutcome,
    /// Header-plus-payload MD5.
    pub md5: CheckOutcome,
    /// A PGP or GPG signature is present but was not checked.
    pub has_payload_signature: bool,
    /// A DSA or RSA header signature is present but was not checked.
    pub has_header_signature: bool,
}

impl SignatureReport {
    /// Returns `true` if no check failed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !self.size.is_mismatch() && !self.md5.is_mismatch()
    }
}

/// Checks the size and MD5 signature tags.
///
/// `header` must be the raw metadata section bytes and `payload` the
/// compressed payload, exactly as stored in the package.
pub fn check_signature(
    signature: &SignatureView,
    header: &[u8],
    payload: &[u8],
) -> Result<SignatureReport> {
    let size = match signature.size()? {
        None => CheckOutcome::Absent,
        Some(expected) => CheckOutcome::compare(
            expected.to_string(),
            (header.len() + payload.len()).to_string(),
        ),
    };

    let md5 = match signature.md5()? {
        None => CheckOutcome::Absent,
        Some(expected) => {
            let mut hasher = Md5::new();
            hasher.update(header);
            hasher.update(payload);
            CheckOutcome::compare(hex::encode(expected), hex::encode(hasher.finalize()))
        }
    };

    Ok(SignatureReport {
        size,
        md5,
        has_payload_signature: signature.has_payload_signature(),
        has_header_signature: signature.has_header_signature(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ReadConfig;
    use crate::metadata::tags::sigtag;
    use crate::section::decode;
    use crate::test_utils::SectionBuilder;

    fn view(builder: SectionBuilder) -> SignatureView {
        let bytes = builder.build();
        SignatureView::new(decode(&mut &bytes[..], &ReadConfig::default()).unwrap())
    }

    #[test]
    fn test_matching_signature() {
        let header = b"header bytes";
        let payload = b"payload";
        let digest: [u8; 16] = Md5::digest(b"header bytespayload").into();
        let sig = view(
            SectionBuilder::new()
                .int32(sigtag::SIZE, &[19])
                .binary(sigtag::MD5, &digest),
        );
        let report = check_signature(&sig, header, payload).unwrap();
        assert_eq!(report.size, CheckOutcome::Ok);
        assert_eq!(report.md5, CheckOutcome::Ok);
        assert!(report.is_ok());
    }

    #[test]
    fn test_mismatch() {
        let sig = view(
            SectionBuilder::new()
                .int32(sigtag::SIZE, &[5])
                .binary(sigtag::MD5, &[0; 16]),
        );
        let report = check_signature(&sig, b"abc", b"def").unwrap();
        assert_eq!(
            report.size,
            CheckOutcome::Mismatch {
                expected: "5".into(),
                actual: "6".into()
            }
        );
        assert!(report.md5.is_mismatch());
        assert!(!report.is_ok());
        assert!(report.size.to_string().starts_with("BAD"));
    }

    #[test]
    fn test_absent_tags() {
        let sig = view(SectionBuilder::new().binary(sigtag::RSA, &[1]));
        let report = check_signature(&sig, b"", b"").unwrap();
        assert_eq!(report.size, CheckOutcome::Absent);
        assert_eq!(report.md5, CheckOutcome::Absent);
        assert!(report.has_header_signature);
        assert!(report.is_ok());
    }
}
