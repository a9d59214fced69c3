//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use rpmkit_core::ReadConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpmkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Maximum compressed payload size (suffixes K, M, G, T)
    #[arg(long, global = true, value_name = "SIZE", value_parser = parse_byte_size)]
    pub max_payload_size: Option<u64>,

    /// Lift decoding limits and accept any lead version
    #[arg(long, global = true)]
    pub permissive: bool,
}

impl Cli {
    /// Builds the decoding limits from the global flags.
    pub fn read_config(&self) -> ReadConfig {
        let mut config = if self.permissive {
            ReadConfig::permissive()
        } else {
            ReadConfig::default()
        };
        if let Some(max) = self.max_payload_size {
            config.max_payload_size = max;
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show package metadata
    Info(PackagesArgs),
    /// List files declared by packages
    List(ListArgs),
    /// Show package changelogs
    Changelog(PackagesArgs),
    /// Verify archived files against package metadata
    Verify(PackagesArgs),
    /// Check the size and MD5 digests in the signature section
    Checksig(PackagesArgs),
    /// Write the decompressed cpio archive
    Payload(PayloadArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackagesArgs {
    /// Package files to read
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Package files to read
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<PathBuf>,

    /// Only list configuration files
    #[arg(short, long, conflicts_with = "doc")]
    pub config: bool,

    /// Only list documentation files
    #[arg(short, long)]
    pub doc: bool,

    /// Show mode, size and modification time
    #[arg(short, long)]
    pub long: bool,
}

#[derive(clap::Args)]
pub struct PayloadArgs {
    /// Package file to read
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Output file (default: standard output)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
