//! Info command implementation

use super::for_each_package;
use crate::cli::PackagesArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use crate::output::PackageInfo;
use anyhow::Result;
use rpmkit_core::ReadConfig;

pub fn execute(
    args: &PackagesArgs,
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    for_each_package(&args.packages, config, formatter, |path, package| {
        let info = add_package_context(PackageInfo::from_metadata(package.metadata()), path)?;
        formatter.format_info(path, &info)
    })
}
