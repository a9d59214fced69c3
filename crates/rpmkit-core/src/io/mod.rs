//! I/O utilities for forward-only package decoding.
//!
//! This module provides helpers shared by the lead, section and archive
//! decoders.

mod counting;

pub use counting::CountingReader;

use std::io::Read;
use std::io::{self};

use crate::RpmError;
use crate::Result;

/// Reads exactly `buf.len()` bytes, reporting early EOF as truncation of `what`.
pub(crate) fn read_exact_or_truncated<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| truncation(e, what, buf.len() as u64))
}

/// Maps an early-EOF I/O error to [`RpmError::Truncated`].
pub(crate) fn truncation(err: io::Error, what: &'static str, expected: u64) -> RpmError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        RpmError::Truncated { what, expected }
    } else {
        RpmError::Io(err)
    }
}

/// Reads and discards `count` bytes.
pub(crate) fn skip_bytes<R: Read + ?Sized>(
    reader: &mut R,
    count: u64,
    what: &'static str,
) -> Result<()> {
    let mut remaining = count;
    let mut buf = [0u8; 64];
    while remaining > 0 {
        #[allow(clippy::cast_possible_truncation)]
        let to_read = remaining.min(buf.len() as u64) as usize;
        read_exact_or_truncated(reader, &mut buf[..to_read], what)?;
        remaining -= to_read as u64;
    }
    Ok(())
}

/// Number of bytes needed to bring `len` up to a multiple of `align`.
#[must_use]
pub const fn padding_to(len: u64, align: u64) -> u64 {
    let remainder = len % align;
    if remainder == 0 { 0 } else { align - remainder }
}
