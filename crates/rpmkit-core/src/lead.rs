//! The fixed 96-byte lead that opens every package.

use std::io::Read;

use byteorder::BigEndian;
use byteorder::ByteOrder;
use log::debug;

use crate::Result;
use crate::RpmError;
use crate::io::read_exact_or_truncated;

/// Lead magic bytes.
pub const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];

/// Size of the lead in bytes.
pub const LEAD_SIZE: usize = 96;

const NAME_LEN: usize = 66;

/// Package type stored in the lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    /// Binary package.
    Binary,
    /// Source package.
    Source,
    /// Any other value.
    Other(u16),
}

impl From<u16> for PackageType {
    fn from(raw: u16) -> Self {
        match raw {
            0 => Self::Binary,
            1 => Self::Source,
            other => Self::Other(other),
        }
    }
}

/// Decoded lead.
///
/// Most fields are superseded by the metadata section; only the magic and
/// version are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    major: u8,
    minor: u8,
    package_type: u16,
    arch: u16,
    name: [u8; NAME_LEN],
    os: u16,
    signature_type: u16,
    reserved: [u8; 16],
}

impl Lead {
    /// Reads and validates a lead.
    ///
    /// With `strict` unset, a version other than 3.0 is accepted.
    ///
    /// # Errors
    ///
    /// - [`RpmError::Truncated`] if fewer than 96 bytes are available
    /// - [`RpmError::BadLeadMagic`] if the magic does not match
    /// - [`RpmError::UnsupportedVersion`] if strict and the version is not 3.0
    pub fn read<R: Read + ?Sized>(reader: &mut R, strict: bool) -> Result<Self> {
        let mut raw = [0u8; LEAD_SIZE];
        read_exact_or_truncated(reader, &mut raw, "lead")?;
        let lead = Self::parse(&raw)?;
        if strict {
            lead.validate()?;
        }
        debug!(
            "lead v{}.{} name={:?} type={:?}",
            lead.major,
            lead.minor,
            lead.name(),
            lead.package_type()
        );
        Ok(lead)
    }

    fn parse(raw: &[u8; LEAD_SIZE]) -> Result<Self> {
        let found = [raw[0], raw[1], raw[2], raw[3]];
        if found != LEAD_MAGIC {
            return Err(RpmError::BadLeadMagic { found });
        }
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&raw[10..10 + NAME_LEN]);
        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&raw[80..96]);
        Ok(Self {
            major: raw[4],
            minor: raw[5],
            package_type: BigEndian::read_u16(&raw[6..8]),
            arch: BigEndian::read_u16(&raw[8..10]),
            name,
            os: BigEndian::read_u16(&raw[76..78]),
            signature_type: BigEndian::read_u16(&raw[78..80]),
            reserved,
        })
    }

    /// Checks that the format version is 3.0.
    pub fn validate(&self) -> Result<()> {
        if self.major == 3 && self.minor == 0 {
            Ok(())
        } else {
            Err(RpmError::UnsupportedVersion {
                major: self.major,
                minor: self.minor,
            })
        }
    }

    /// Format major version.
    #[must_use]
    pub const fn major(&self) -> u8 {
        self.major
    }

    /// Format minor version.
    #[must_use]
    pub const fn minor(&self) -> u8 {
        self.minor
    }

    /// Binary or source package.
    #[must_use]
    pub fn package_type(&self) -> PackageType {
        PackageType::from(self.package_type)
    }

    /// Architecture number.
    #[must_use]
    pub const fn arch(&self) -> u16 {
        self.arch
    }

    /// Package name, cut at the first NUL.
    #[must_use]
    pub fn name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Operating system number.
    #[must_use]
    pub const fn os(&self) -> u16 {
        self.os
    }

    /// Signature type; 5 means a tag-indexed signature section follows.
    #[must_use]
    pub const fn signature_type(&self) -> u16 {
        self.signature_type
    }

    /// Reserved trailing bytes.
    #[must_use]
    pub const fn reserved(&self) -> &[u8; 16] {
        &self.reserved
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::lead_bytes;

    #[test]
    fn test_read_lead() {
        let raw = lead_bytes("hello-1.0-1");
        let lead = Lead::read(&mut &raw[..], true).unwrap();
        assert_eq!(lead.major(), 3);
        assert_eq!(lead.minor(), 0);
        assert_eq!(lead.name(), "hello-1.0-1");
        assert_eq!(lead.package_type(), PackageType::Binary);
        assert_eq!(lead.os(), 1);
        assert_eq!(lead.signature_type(), 5);
    }

    #[test]
    fn test_bad_magic() {
        let mut raw = lead_bytes("x");
        raw[0] = 0;
        assert!(matches!(
            Lead::read(&mut &raw[..], true),
            Err(RpmError::BadLeadMagic {
                found: [0, 0xab, 0xee, 0xdb]
            })
        ));
    }

    #[test]
    fn test_truncated() {
        let raw = lead_bytes("x");
        assert!(matches!(
            Lead::read(&mut &raw[..50], true),
            Err(RpmError::Truncated {
                what: "lead",
                expected: 96
            })
        ));
    }

    #[test]
    fn test_version_checks() {
        let mut raw = lead_bytes("x");
        raw[4] = 4;
        assert!(matches!(
            Lead::read(&mut &raw[..], true),
            Err(RpmError::UnsupportedVersion { major: 4, minor: 0 })
        ));
        let lead = Lead::read(&mut &raw[..], false).unwrap();
        assert_eq!(lead.major(), 4);
    }

    #[test]
    fn test_full_length_name() {
        let mut raw = lead_bytes("");
        raw[10..76].fill(b'a');
        let lead = Lead::read(&mut &raw[..], true).unwrap();
        assert_eq!(lead.name().len(), 66);
    }
}
