//! `sigcheck digest` – print a file's digest as a manifest line.

use anyhow::{Context, Result};
use sigcheck_core::checksum;
use sigcheck_core::config::SigcheckConfig;
use std::path::Path;

use super::resolve_algorithm;

pub fn run_digest(cfg: &SigcheckConfig, path: &Path, algorithm: Option<&str>) -> Result<()> {
    let algorithm = resolve_algorithm(algorithm, cfg.algorithm)?;
    let digest = checksum::digest_path(path, &algorithm)
        .with_context(|| format!("{} {}", algorithm, path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
