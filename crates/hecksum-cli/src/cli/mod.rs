//! CLI for hecksum.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hecksum_core::config::{self, SinkKind};
use std::path::Path;

use commands::{run_batch, run_checksum, run_list, run_try};

/// Top-level CLI for hecksum.
#[derive(Debug, Parser)]
#[command(name = "hecksum")]
#[command(about = "hecksum: verify published downloads against vendor checksums", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Result sink override for `hecksum run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkArg {
    Log,
    JsonLines,
    Airtable,
}

impl From<SinkArg> for SinkKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Log => SinkKind::Log,
            SinkArg::JsonLines => SinkKind::JsonLines,
            SinkArg::Airtable => SinkKind::Airtable,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Verify every registered vendor and report each result.
    Run {
        /// Surface vendor fetch/extraction failures instead of skipping those checks.
        #[arg(long)]
        debug: bool,
        /// Only run the named extractor (repeatable).
        #[arg(long = "only", value_name = "EXTRACTOR")]
        only: Vec<String>,
        /// Override the result sink from config.
        #[arg(long, value_enum)]
        sink: Option<SinkArg>,
    },

    /// Run one extractor and print each reference, its verification, and elapsed time.
    Try {
        /// Extractor name (see `hecksum list`).
        extractor: String,
    },

    /// List registered extractors.
    List,

    /// Compute the checksum of a local file.
    Checksum {
        /// Path to the file.
        path: String,
        /// Hash function: sha224, sha256, sha384 or sha512.
        #[arg(long, default_value = "sha256")]
        algorithm: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { debug, only, sink } => {
                run_batch(&cfg, debug, only, sink.map(SinkKind::from)).await?
            }
            CliCommand::Try { extractor } => run_try(&cfg, &extractor).await?,
            CliCommand::List => run_list(),
            CliCommand::Checksum { path, algorithm } => {
                run_checksum(Path::new(&path), &algorithm).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
