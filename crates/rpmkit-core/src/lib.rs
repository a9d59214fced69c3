//! Bounds-checked RPM package reader with payload verification.
//!
//! `rpmkit-core` decodes the four parts of an RPM v3 package (lead,
//! signature section, metadata section and compressed cpio payload) and
//! cross-checks the per-file claims of the metadata section against the
//! files physically present in the payload.
//!
//! Every offset and count read from the package is validated before it is
//! used to slice a buffer, so malformed packages fail with a typed error
//! instead of panicking or reading out of range.
//!
//! # Examples
//!
//! ```no_run
//! use rpmkit_core::ReadConfig;
//! use rpmkit_core::verify_package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReadConfig::default();
//! let report = verify_package("hello-1.0-1.x86_64.rpm", &config)?;
//! println!("{} files checked, {} mismatched", report.files_checked, report.mismatched_files);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod formats;
pub mod inspection;
pub mod io;
pub mod lead;
pub mod metadata;
pub mod package;
pub mod section;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::check_package_signature;
pub use api::list_files;
pub use api::read_package;
pub use api::verify_package;
pub use config::ReadConfig;
pub use error::ErrorKind;
pub use error::Result;
pub use error::RpmError;
pub use formats::Compressor;
pub use formats::CpioEntry;
pub use formats::CpioReader;
pub use inspection::DigestAlgorithm;
pub use inspection::DigestStatus;
pub use inspection::SignatureReport;
pub use inspection::VerificationReport;
pub use inspection::VerificationStatus;
pub use inspection::VerifyResult;
pub use lead::Lead;
pub use metadata::ChangelogEntry;
pub use metadata::FileFlags;
pub use metadata::FileRecord;
pub use metadata::MetadataView;
pub use metadata::SignatureView;
pub use package::Package;
pub use section::Section;
pub use section::TagDescriptor;
pub use section::Value;
pub use section::ValueType;
pub use types::FileKind;
