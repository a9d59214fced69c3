//! Path-based convenience functions.

use std::path::Path;

use crate::Package;
use crate::ReadConfig;
use crate::Result;
use crate::inspection::SignatureReport;
use crate::inspection::VerificationReport;
use crate::metadata::FileRecord;

/// Opens and decodes a package file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
///
/// # Examples
///
/// ```no_run
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::read_package;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let package = read_package("hello-1.0-1.x86_64.rpm", &ReadConfig::default())?;
/// println!("{}", package.metadata().summary()?);
/// # Ok(())
/// # }
/// ```
pub fn read_package<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<Package> {
    Package::open(path, config)
}

/// Verifies every file of a package against its metadata.
///
/// Mismatching fields are reported in the returned report, not as errors.
///
/// # Errors
///
/// Returns an error if the package is malformed, the payload cannot be
/// decompressed, or metadata and archive disagree on the file count.
///
/// # Examples
///
/// ```no_run
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::verify_package;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = verify_package("hello-1.0-1.x86_64.rpm", &ReadConfig::default())?;
/// println!("{}: {} files checked", report.status, report.files_checked);
/// # Ok(())
/// # }
/// ```
pub fn verify_package<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<VerificationReport> {
    Package::open(path, config)?.verify()
}

/// Lists the file records of a package.
///
/// # Errors
///
/// Returns an error if the package is malformed or its file arrays
/// disagree.
pub fn list_files<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<Vec<FileRecord>> {
    Package::open(path, config)?.metadata().files()
}

/// Checks the size and MD5 recorded in a package's signature section.
///
/// # Errors
///
/// Returns an error if the package is malformed.
pub fn check_package_signature<P: AsRef<Path>>(
    path: P,
    config: &ReadConfig,
) -> Result<SignatureReport> {
    Package::open(path, config)?.check_signature()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::VerificationStatus;
    use crate::test_utils::PackageBuilder;
    use crate::test_utils::TestFile;

    #[test]
    fn test_path_functions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool-2.0-1.x86_64.rpm");
        let bytes = PackageBuilder::new("tool", "2.0", "1")
            .file(TestFile::new("/usr/bin/tool", b"#!/bin/sh\necho tool\n").mode(0o100_755))
            .build();
        std::fs::write(&path, bytes).unwrap();

        let config = ReadConfig::default();
        let package = read_package(&path, &config).unwrap();
        assert_eq!(package.metadata().name().unwrap(), "tool");

        let files = list_files(&path, &config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/usr/bin/tool");

        let report = verify_package(&path, &config).unwrap();
        assert_eq!(report.status, VerificationStatus::Pass);

        assert!(check_package_signature(&path, &config).unwrap().is_ok());
    }
}
