//! Typed view over the signature section.

use super::tags::sigtag;
use crate::Result;
use crate::section::OptionalTag;
use crate::section::Section;

/// Read-only accessors for the signature section.
///
/// Every signature tag is optional; absent tags read as `None`.
#[derive(Debug, Clone)]
pub struct SignatureView {
    section: Section,
}

impl SignatureView {
    /// Wraps a decoded signature section.
    #[must_use]
    pub const fn new(section: Section) -> Self {
        Self { section }
    }

    /// Returns the underlying section.
    #[must_use]
    pub const fn section(&self) -> &Section {
        &self.section
    }

    /// Byte count of the metadata section plus the compressed payload.
    pub fn size(&self) -> Result<Option<u32>> {
        Ok(self
            .section
            .get_int32(sigtag::SIZE)
            .optional()?
            .map(i32::cast_unsigned))
    }

    /// MD5 of the metadata section plus the compressed payload.
    pub fn md5(&self) -> Result<Option<&[u8]>> {
        self.section.get_binary(sigtag::MD5).optional()
    }

    /// Uncompressed payload size.
    pub fn payload_size(&self) -> Result<Option<u32>> {
        Ok(self
            .section
            .get_int32(sigtag::PAYLOAD_SIZE)
            .optional()?
            .map(i32::cast_unsigned))
    }

    /// Hex SHA1 of the metadata section.
    pub fn sha1(&self) -> Result<Option<String>> {
        self.section.get_string(sigtag::SHA1).optional()
    }

    /// Returns `true` if a PGP or GPG signature over header and payload exists.
    #[must_use]
    pub fn has_payload_signature(&self) -> bool {
        self.section.has(sigtag::PGP) || self.section.has(sigtag::GPG)
    }

    /// Returns `true` if a DSA or RSA signature over the header exists.
    #[must_use]
    pub fn has_header_signature(&self) -> bool {
        self.section.has(sigtag::DSA) || self.section.has(sigtag::RSA)
    }
}
