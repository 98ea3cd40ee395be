//! CLI command handlers. Each command is in its own file.

mod digest;
mod verify;

pub use digest::run_digest;
pub use verify::{run_verify, VerifyArgs};

use anyhow::{Context, Result};
use sigcheck_core::DigestAlgorithm;

/// `--algorithm` flag if given, else the configured algorithm.
fn resolve_algorithm(flag: Option<&str>, configured: DigestAlgorithm) -> Result<DigestAlgorithm> {
    match flag {
        Some(name) => name.parse::<DigestAlgorithm>().context("--algorithm"),
        None => Ok(configured),
    }
}
