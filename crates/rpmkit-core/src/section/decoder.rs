//! Streaming section decoder.

use std::io::Read;

use byteorder::BigEndian;
use byteorder::ByteOrder;
use log::debug;
use log::trace;

use super::DESCRIPTOR_SIZE;
use super::SECTION_HEADER_SIZE;
use super::SECTION_MAGIC;
use super::Section;
use super::TagDescriptor;
use super::ValueType;
use crate::Result;
use crate::RpmError;
use crate::config::ReadConfig;
use crate::io::read_exact_or_truncated;

/// Decodes one section from `reader`.
///
/// Consumes exactly the header, the index table and the store; the caller
/// handles any alignment padding that follows.
///
/// # Errors
///
/// - [`RpmError::BadMagic`] if the first three bytes are not `8e ad e8`
/// - [`RpmError::Truncated`] if the stream ends early
/// - [`RpmError::LimitExceeded`] if the declared index count or store size
///   exceeds `config`
/// - [`RpmError::UnknownValueType`] for a type code outside `0..=9`
/// - [`RpmError::MalformedSection`] if any descriptor points outside the store
///
/// # Examples
///
/// ```
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::section::decode;
///
/// let bytes = [0x8e, 0xad, 0xe8, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
/// let section = decode(&mut &bytes[..], &ReadConfig::default())?;
/// assert!(section.descriptors().is_empty());
/// # Ok::<(), rpmkit_core::RpmError>(())
/// ```
pub fn decode<R: Read + ?Sized>(reader: &mut R, config: &ReadConfig) -> Result<Section> {
    let mut header = [0u8; SECTION_HEADER_SIZE];
    read_exact_or_truncated(reader, &mut header, "section header")?;

    let found = [header[0], header[1], header[2]];
    if found != SECTION_MAGIC {
        return Err(RpmError::BadMagic { found });
    }
    let version = header[3];
    let reserved = [header[4], header[5], header[6], header[7]];
    let index_count = BigEndian::read_u32(&header[8..12]);
    let store_size = BigEndian::read_u32(&header[12..16]);

    debug!("section v{version}: {index_count} descriptors, {store_size} byte store");

    if index_count > config.max_index_count {
        return Err(RpmError::LimitExceeded {
            resource: "section index count",
            actual: u64::from(index_count),
            max: u64::from(config.max_index_count),
        });
    }
    if store_size > config.max_store_size {
        return Err(RpmError::LimitExceeded {
            resource: "section store size",
            actual: u64::from(store_size),
            max: u64::from(config.max_store_size),
        });
    }

    let mut table = vec![0u8; index_count as usize * DESCRIPTOR_SIZE];
    read_exact_or_truncated(reader, &mut table, "section index")?;

    let descriptors = table
        .chunks_exact(DESCRIPTOR_SIZE)
        .map(parse_descriptor)
        .collect::<Result<Vec<_>>>()?;

    let mut store = vec![0u8; store_size as usize];
    read_exact_or_truncated(reader, &mut store, "section store")?;

    Section::new(version, reserved, descriptors, store)
}

fn parse_descriptor(raw: &[u8]) -> Result<TagDescriptor> {
    let tag = BigEndian::read_i32(&raw[0..4]);
    let code = BigEndian::read_u32(&raw[4..8]);
    let offset = BigEndian::read_u32(&raw[8..12]);
    let count = BigEndian::read_u32(&raw[12..16]);

    let value_type = ValueType::from_code(code).ok_or(RpmError::UnknownValueType { tag, code })?;
    trace!("descriptor tag={tag} type={value_type} offset={offset} count={count}");

    Ok(TagDescriptor {
        tag,
        value_type,
        offset,
        count,
    })
}

/// Checks that every tag in `required` is present.
///
/// # Errors
///
/// Returns [`RpmError::MissingRequiredTag`] naming the first absent tag in
/// `required` order.
pub fn validate_required(section: &Section, required: &[i32]) -> Result<()> {
    match required.iter().find(|&&tag| !section.has(tag)) {
        Some(&tag) => Err(RpmError::MissingRequiredTag(tag)),
        None => Ok(()),
    }
}

/// Number of padding bytes following a section whose store is `store_size`
/// bytes long, so the next section starts on an 8-byte boundary.
#[must_use]
pub const fn alignment_padding(store_size: usize) -> usize {
    (8 - store_size % 8) % 8
}
