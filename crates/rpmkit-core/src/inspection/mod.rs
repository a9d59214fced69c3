//! Verification of packaged files and signature digests.
//!
//! # Examples
//!
//! ```no_run
//! use rpmkit_core::ReadConfig;
//! use rpmkit_core::VerificationStatus;
//! use rpmkit_core::verify_package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = verify_package("hello-1.0-1.x86_64.rpm", &ReadConfig::default())?;
//! if report.status == VerificationStatus::Fail {
//!     for result in report.mismatches() {
//!         eprintln!("{} {}", result.flag_string(), result.path);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod checksig;
pub mod report;
pub mod verify;

pub use checksig::CheckOutcome;
pub use checksig::SignatureReport;
pub use checksig::check_signature;
pub use report::DigestAlgorithm;
pub use report::DigestMismatch;
pub use report::DigestStatus;
pub use report::FieldMismatch;
pub use report::VerificationReport;
pub use report::VerificationStatus;
pub use report::VerifyResult;
pub use verify::verify_archive;
