//! Payload command implementation.

use crate::cli::PayloadArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use rpmkit_core::Package;
use rpmkit_core::ReadConfig;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::io::{self};

pub fn execute(
    args: &PayloadArgs,
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let package = add_package_context(Package::open(&args.package, config), &args.package)?;

    let written = match &args.output {
        Some(output) => {
            let file = File::create(output)
                .with_context(|| format!("failed to create '{}'", output.display()))?;
            let mut writer = BufWriter::new(file);
            let written =
                add_package_context(package.write_archive(&mut writer), &args.package)?;
            writer.flush()?;
            formatter.format_success(&format!(
                "Wrote {written} archive bytes to {}",
                output.display()
            ));
            written
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            let written =
                add_package_context(package.write_archive(&mut writer), &args.package)?;
            writer.flush()?;
            written
        }
    };

    log::debug!("{}: {written} archive bytes", args.package.display());
    Ok(())
}
