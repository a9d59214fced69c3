//! Verify command implementation

use super::for_each_package;
use crate::cli::PackagesArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use rpmkit_core::ReadConfig;
use rpmkit_core::VerificationStatus;

pub fn execute(
    args: &PackagesArgs,
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    for_each_package(&args.packages, config, formatter, |path, package| {
        let report = add_package_context(package.verify(), path)?;

        formatter.format_verification_report(path, &report)?;

        match report.status {
            VerificationStatus::Pass => Ok(()),
            VerificationStatus::Warning => {
                formatter.format_warning(&format!(
                    "{}: {} file digests could not be verified",
                    path.display(),
                    report.unverifiable_digests
                ));
                Ok(())
            }
            VerificationStatus::Fail => {
                bail!(
                    "Verification failed for '{}': {} of {} files differ",
                    path.display(),
                    report.mismatched_files,
                    report.files_checked
                )
            }
        }
    })
}
