//! Subcommand implementations.

pub mod changelog;
pub mod checksig;
pub mod completion;
pub mod info;
pub mod list;
pub mod payload;
pub mod verify;

use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use rpmkit_core::Package;
use rpmkit_core::ReadConfig;
use std::path::Path;
use std::path::PathBuf;

/// Runs `run` on every package, reporting failures without stopping.
///
/// Fails at the end if any package failed.
fn for_each_package<F>(
    packages: &[PathBuf],
    config: &ReadConfig,
    formatter: &dyn OutputFormatter,
    mut run: F,
) -> Result<()>
where
    F: FnMut(&Path, &Package) -> Result<()>,
{
    let mut failed = 0usize;
    for path in packages {
        let outcome = add_package_context(Package::open(path, config), path)
            .and_then(|package| run(path, &package));
        if let Err(e) = outcome {
            log::debug!("{}: {e:#}", path.display());
            formatter.format_error(&e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} packages failed", packages.len());
    }
    Ok(())
}
