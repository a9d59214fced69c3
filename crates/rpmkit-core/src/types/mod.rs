//! Shared value types.

mod file_kind;

pub use file_kind::FileKind;
