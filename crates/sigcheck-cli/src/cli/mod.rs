//! CLI for sigcheck.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sigcheck_core::{config, logging};
use std::path::PathBuf;

use commands::{run_digest, run_verify, VerifyArgs};

/// Top-level CLI for sigcheck.
#[derive(Debug, Parser)]
#[command(name = "sigcheck")]
#[command(about = "sigcheck: verify a directory against its digest manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Verify every file listed in DIR's manifest.
    Verify {
        /// Directory holding the data files and the manifest.
        dir: PathBuf,
        /// Manifest file name inside DIR (default: sha1sum.txt, or per --algorithm).
        #[arg(long, value_name = "NAME")]
        manifest: Option<String>,
        /// Digest algorithm: sha1 or sha256.
        #[arg(long, value_name = "ALGO")]
        algorithm: Option<String>,
        /// Hash up to N files concurrently.
        #[arg(long, value_name = "N", conflicts_with = "unbounded")]
        jobs: Option<usize>,
        /// Hash every file at once (one worker per manifest entry).
        #[arg(long)]
        unbounded: bool,
        /// Report every failing file instead of stopping at one.
        #[arg(long)]
        collect_all: bool,
    },

    /// Print the digest of a file in manifest line format.
    Digest {
        /// Path to the file.
        path: PathBuf,
        /// Digest algorithm: sha1 or sha256.
        #[arg(long, value_name = "ALGO")]
        algorithm: Option<String>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        // Logging depends on the [log] section, so it starts after the config is read.
        if let Err(e) = logging::init_logging(cfg.log.as_ref()) {
            logging::init_logging_stderr();
            tracing::warn!("logging setup failed, using stderr defaults: {:#}", e);
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Verify {
                dir,
                manifest,
                algorithm,
                jobs,
                unbounded,
                collect_all,
            } => {
                let args = VerifyArgs {
                    manifest,
                    algorithm,
                    jobs,
                    unbounded,
                    collect_all,
                };
                run_verify(&cfg, &dir, args)?
            }
            CliCommand::Digest { path, algorithm } => {
                run_digest(&cfg, &path, algorithm.as_deref())?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
