//! Typed views over the signature and metadata sections.

mod changelog;
mod files;
mod header;
mod signature;
pub mod tags;

pub use changelog::ChangelogEntry;
pub use files::FileRecord;
pub use header::MetadataView;
pub use signature::SignatureView;
pub use tags::FileFlags;
pub use tags::REQUIRED_HEADER_TAGS;

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Converts a signed 32-bit Unix timestamp.
pub(crate) fn unix_time(secs: i32) -> SystemTime {
    let offset = Duration::from_secs(u64::from(secs.unsigned_abs()));
    if secs >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}
