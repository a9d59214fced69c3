//! Payload decompression.
//!
//! The metadata section names the payload compressor; this module maps
//! that name to a streaming decoder.
//!
//! # Supported Codecs
//!
//! - **gzip**: the historical default, also used when no name is given
//! - **bzip2**
//! - **xz**: LZMA2 in the xz container
//! - **lzma**: raw LZMA-alone streams from older builds
//! - **zstd**

use std::io::Read;
use std::io::{self};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;
use xz2::stream::Stream;
use zstd::stream::read::Decoder as ZstdDecoder;

use crate::Result;
use crate::RpmError;

/// Payload compression codec.
///
/// # Examples
///
/// ```
/// use rpmkit_core::Compressor;
///
/// assert_eq!(Compressor::from_name("xz")?, Compressor::Xz);
/// assert_eq!(Compressor::from_name("")?, Compressor::Gzip);
/// assert!(Compressor::from_name("lz4").is_err());
/// # Ok::<(), rpmkit_core::RpmError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compressor {
    /// Deflate in a gzip container.
    Gzip,
    /// Burrows-Wheeler compression.
    Bzip2,
    /// LZMA2 in an xz container.
    Xz,
    /// Legacy LZMA-alone stream.
    Lzma,
    /// Zstandard.
    Zstd,
}

impl Compressor {
    /// Maps a payload compressor name to a codec.
    ///
    /// # Errors
    ///
    /// Returns [`RpmError::UnsupportedCompressor`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "" | "gzip" => Ok(Self::Gzip),
            "bzip2" => Ok(Self::Bzip2),
            "xz" => Ok(Self::Xz),
            "lzma" => Ok(Self::Lzma),
            "zstd" => Ok(Self::Zstd),
            other => Err(RpmError::UnsupportedCompressor(other.to_string())),
        }
    }

    /// Returns the canonical compressor name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in a decoder for this codec.
    ///
    /// # Errors
    ///
    /// Fails if the decoder cannot be initialized.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Result<Box<dyn Read + 'a>> {
        let decoder: Box<dyn Read + 'a> = match self {
            Self::Gzip => Box::new(GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(BzDecoder::new(reader)),
            Self::Xz => Box::new(XzDecoder::new_multi_decoder(reader)),
            Self::Lzma => {
                let stream = Stream::new_lzma_decoder(u64::MAX).map_err(io::Error::other)?;
                Box::new(XzDecoder::new_stream(reader, stream))
            }
            Self::Zstd => Box::new(ZstdDecoder::new(reader)?),
        };
        Ok(decoder)
    }
}
