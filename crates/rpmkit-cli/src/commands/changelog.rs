//! Changelog command implementation

use super::for_each_package;
use crate::cli::PackagesArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use rpmkit_core::ReadConfig;

pub fn execute(
    args: &PackagesArgs,
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    for_each_package(&args.packages, config, formatter, |path, package| {
        let entries = add_package_context(package.metadata().changelog(), path)?;
        formatter.format_changelog(path, &entries)
    })
}
