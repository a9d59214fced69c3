//! List command implementation

use super::for_each_package;
use crate::cli::ListArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use rpmkit_core::FileFlags;
use rpmkit_core::ReadConfig;

pub fn execute(args: &ListArgs, config: &ReadConfig, formatter: &dyn OutputFormatter) -> Result<()> {
    let filter = if args.config {
        Some(FileFlags::CONFIG)
    } else if args.doc {
        Some(FileFlags::DOC)
    } else {
        None
    };

    for_each_package(&args.packages, config, formatter, |path, package| {
        let meta = package.metadata();
        let files = match filter {
            Some(flags) => meta.files_with_flag(flags),
            None => meta.files(),
        };
        let files = add_package_context(files, path)?;
        formatter.format_files(path, &files, args.long)
    })
}
