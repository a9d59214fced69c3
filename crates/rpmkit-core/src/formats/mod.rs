//! Payload formats: compression codecs and the cpio archive.

pub mod compression;
pub mod cpio;

pub use compression::Compressor;
pub use cpio::CpioEntry;
pub use cpio::CpioFormat;
pub use cpio::CpioHeader;
pub use cpio::CpioReader;
