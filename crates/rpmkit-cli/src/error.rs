//! Error conversion utilities for CLI.
//!
//! Converts rpmkit-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use rpmkit_core::ErrorKind;
use rpmkit_core::RpmError;
use std::path::Path;

/// Converts `RpmError` to user-friendly anyhow error with context
pub fn convert_rpm_error(err: RpmError, package: &Path) -> anyhow::Error {
    let name = package.display();
    match err {
        RpmError::BadLeadMagic { .. } => {
            anyhow!(
                "'{name}' is not an RPM package: {err}\n\
                 HINT: Check that the file is a binary or source package."
            )
        }
        RpmError::UnsupportedVersion { .. } => {
            anyhow!(
                "Unsupported package '{name}': {err}\n\
                 HINT: Use --permissive to read packages with other lead versions."
            )
        }
        RpmError::UnsupportedCompressor(ref compressor) => {
            anyhow!(
                "Payload of '{name}' uses unsupported compressor '{compressor}'\n\
                 HINT: Supported compressors: gzip, bzip2, xz, lzma, zstd. \
                 Metadata commands still work."
            )
        }
        RpmError::LimitExceeded {
            resource: "payload size",
            ..
        } => {
            anyhow!(
                "Package '{name}' is too large: {err}\n\
                 HINT: Use --max-payload-size to raise the limit."
            )
        }
        RpmError::LimitExceeded { .. } => {
            anyhow!(
                "Decoding limit exceeded in '{name}': {err}\n\
                 HINT: Use --permissive to lift decoding limits for trusted packages."
            )
        }
        RpmError::CountMismatch { .. } => {
            anyhow!(
                "Payload of '{name}' does not match its metadata: {err}\n\
                 HINT: The package may have been modified after it was built."
            )
        }
        RpmError::Io(io_err) => {
            anyhow!("I/O error while reading '{name}': {io_err}")
        }
        _ => match err.kind() {
            ErrorKind::Truncation => anyhow!(
                "Package '{name}' is truncated: {err}\n\
                 HINT: The download may be incomplete."
            ),
            ErrorKind::Format | ErrorKind::Bounds | ErrorKind::MissingField => anyhow!(
                "Invalid package '{name}': {err}\n\
                 HINT: The package may be corrupted or malformed."
            ),
            _ => anyhow::Error::from(err).context(format!("Error reading package '{name}'")),
        },
    }
}

/// Adds package context to a core error
pub fn add_package_context<T>(result: Result<T, RpmError>, package: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_rpm_error(e, package))
}
