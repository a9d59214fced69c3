//! Checksig command implementation

use super::for_each_package;
use crate::cli::PackagesArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use rpmkit_core::ReadConfig;

pub fn execute(
    args: &PackagesArgs,
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    for_each_package(&args.packages, config, formatter, |path, package| {
        let report = add_package_context(package.check_signature(), path)?;
        formatter.format_signature_report(path, &report)?;
        if !report.is_ok() {
            bail!(
                "Digest check failed for '{}'\n\
                 HINT: The package was modified or damaged after signing.",
                path.display()
            );
        }
        Ok(())
    })
}
