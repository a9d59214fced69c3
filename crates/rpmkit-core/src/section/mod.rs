//! Tag-indexed sections.
//!
//! Both the signature and the metadata parts of a package use the same
//! layout: a 16-byte header, an index table of 16-byte descriptors, and a
//! store of raw bytes the descriptors point into.
//!
//! ```text
//! +-------+---------+----------+---------+------------+--------------------+-------+
//! | magic | version | reserved | nindex  | store size | nindex descriptors | store |
//! |  3 B  |   1 B   |   4 B    | 4 B BE  |   4 B BE   |      16 B each     |       |
//! +-------+---------+----------+---------+------------+--------------------+-------+
//! ```
//!
//! A [`Section`] owns its store. Descriptors are offset/count views into it
//! and are only turned into values on access, after the span has been
//! checked against the store length.

mod decoder;
mod store;
mod value;

pub use decoder::alignment_padding;
pub use decoder::decode;
pub use decoder::validate_required;
pub(crate) use store::OptionalTag;
pub use value::Value;
pub use value::ValueType;

use std::ops::Range;

use crate::Result;
use crate::RpmError;

/// Section magic bytes.
pub const SECTION_MAGIC: [u8; 3] = [0x8e, 0xad, 0xe8];

/// Size of the fixed section header preceding the index table.
pub const SECTION_HEADER_SIZE: usize = 16;

/// Size of one descriptor in the index table.
pub const DESCRIPTOR_SIZE: usize = 16;

/// One entry of a section's index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagDescriptor {
    /// Tag number.
    pub tag: i32,
    /// How the span is decoded.
    pub value_type: ValueType,
    /// Start of the span in the store.
    pub offset: u32,
    /// Number of elements (strings for string arrays).
    pub count: u32,
}

/// A decoded tag-indexed section.
///
/// Immutable once decoded; safe to share between readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    version: u8,
    reserved: [u8; 4],
    descriptors: Vec<TagDescriptor>,
    store: Vec<u8>,
}

impl Section {
    /// Assembles a section from decoded parts, checking every descriptor span.
    ///
    /// # Errors
    ///
    /// Returns [`RpmError::MalformedSection`] if any descriptor points
    /// outside the store.
    pub fn new(
        version: u8,
        reserved: [u8; 4],
        descriptors: Vec<TagDescriptor>,
        store: Vec<u8>,
    ) -> Result<Self> {
        let section = Self {
            version,
            reserved,
            descriptors,
            store,
        };
        for descriptor in &section.descriptors {
            section.span(descriptor)?;
        }
        Ok(section)
    }

    /// Returns the section format version byte.
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Returns the index table in table order.
    #[must_use]
    pub fn descriptors(&self) -> &[TagDescriptor] {
        &self.descriptors
    }

    /// Returns the raw store bytes.
    #[must_use]
    pub fn store(&self) -> &[u8] {
        &self.store
    }

    /// Returns the first descriptor carrying `tag`, in table order.
    #[must_use]
    pub fn descriptor(&self, tag: i32) -> Option<&TagDescriptor> {
        self.descriptors.iter().find(|d| d.tag == tag)
    }

    /// Returns `true` if any descriptor carries `tag`.
    #[must_use]
    pub fn has(&self, tag: i32) -> bool {
        self.descriptor(tag).is_some()
    }

    /// Returns the value type and raw span of the first descriptor for `tag`.
    ///
    /// For `StringZ`/`I18nString` the span excludes the terminating NUL; for
    /// `StringArray` it covers every string including their terminators.
    ///
    /// # Errors
    ///
    /// - [`RpmError::TagNotFound`] if no descriptor carries `tag`
    /// - [`RpmError::UnsupportedValueType`] for `Null` and `Int64`
    /// - [`RpmError::MalformedSection`] if the span leaves the store
    pub fn get(&self, tag: i32) -> Result<(ValueType, &[u8])> {
        let descriptor = self.descriptor(tag).ok_or(RpmError::TagNotFound(tag))?;
        if descriptor.value_type.is_unsupported() {
            return Err(RpmError::UnsupportedValueType {
                tag,
                value_type: descriptor.value_type,
            });
        }
        let range = self.span(descriptor)?;
        Ok((descriptor.value_type, &self.store[range]))
    }

    /// Decodes the first descriptor for `tag` into a typed [`Value`].
    pub fn value(&self, tag: i32) -> Result<Value> {
        let (value_type, raw) = self.get(tag)?;
        Value::decode(value_type, raw).ok_or(RpmError::UnsupportedValueType { tag, value_type })
    }

    /// Computes the store range a descriptor covers.
    fn span(&self, descriptor: &TagDescriptor) -> Result<Range<usize>> {
        let store_len = self.store.len();
        let start = descriptor.offset as usize;
        let out_of_bounds = |needed: u64| RpmError::MalformedSection {
            tag: descriptor.tag,
            offset: u64::from(descriptor.offset),
            needed,
            store_size: store_len as u64,
        };

        if start > store_len {
            return Err(out_of_bounds(0));
        }

        match descriptor.value_type.width() {
            Some(width) => {
                let needed = u64::from(descriptor.count) * width;
                let end = u64::from(descriptor.offset) + needed;
                if end > store_len as u64 {
                    return Err(out_of_bounds(needed));
                }
                #[allow(clippy::cast_possible_truncation)]
                Ok(start..end as usize)
            }
            None => {
                let strings = if descriptor.value_type == ValueType::StringArray {
                    descriptor.count
                } else {
                    1
                };
                let mut end = start;
                for _ in 0..strings {
                    let nul = self.store[end..]
                        .iter()
                        .position(|&b| b == 0)
                        .ok_or_else(|| out_of_bounds((store_len - start + 1) as u64))?;
                    end += nul + 1;
                }
                if descriptor.value_type == ValueType::StringArray {
                    Ok(start..end)
                } else {
                    Ok(start..end - 1)
                }
            }
        }
    }

    /// Size of the encoded section: header, index table and store.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SECTION_HEADER_SIZE + self.descriptors.len() * DESCRIPTOR_SIZE + self.store.len()
    }

    /// Reproduces the raw bytes this section was decoded from.
    ///
    /// Used to hash the metadata section for signature digest checks.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&SECTION_MAGIC);
        out.push(self.version);
        out.extend_from_slice(&self.reserved);
        out.extend_from_slice(&(self.descriptors.len() as u32).to_be_bytes());
        out.extend_from_slice(&(self.store.len() as u32).to_be_bytes());
        for d in &self.descriptors {
            out.extend_from_slice(&d.tag.to_be_bytes());
            out.extend_from_slice(&d.value_type.code().to_be_bytes());
            out.extend_from_slice(&d.offset.to_be_bytes());
            out.extend_from_slice(&d.count.to_be_bytes());
        }
        out.extend_from_slice(&self.store);
        out
    }
}
