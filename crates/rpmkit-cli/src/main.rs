//! rpmkit CLI - Command-line utility for inspecting and verifying RPM
//! packages.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let config = cli.read_config();

    match &cli.command {
        cli::Commands::Info(args) => commands::info::execute(args, &config, &*formatter),
        cli::Commands::List(args) => commands::list::execute(args, &config, &*formatter),
        cli::Commands::Changelog(args) => {
            commands::changelog::execute(args, &config, &*formatter)
        }
        cli::Commands::Verify(args) => commands::verify::execute(args, &config, &*formatter),
        cli::Commands::Checksig(args) => commands::checksig::execute(args, &config, &*formatter),
        cli::Commands::Payload(args) => commands::payload::execute(args, &config, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr; `RPMKIT_LOG` overrides the level picked from flags.
fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("RPMKIT_LOG", default))
        .format_timestamp(None)
        .init();
}
