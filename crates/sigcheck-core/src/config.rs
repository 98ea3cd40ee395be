use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::DigestAlgorithm;
use crate::verifier::{Concurrency, VerifyOptions};

/// Log output (optional `[log]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directives used when `RUST_LOG` is unset, e.g. `"warn,sigcheck_core=debug"`.
    pub filter: Option<String>,
    /// Append to `$XDG_STATE_HOME/sigcheck/sigcheck.log` (true) or log to stderr (false).
    pub to_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: None,
            to_file: true,
        }
    }
}

/// Global configuration loaded from `~/.config/sigcheck/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigcheckConfig {
    /// Digest algorithm used for manifests ("sha1" or "sha256").
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    /// Manifest file name inside the verified directory. Defaults per algorithm
    /// (`sha1sum.txt`, `sha256sum.txt`).
    #[serde(default)]
    pub manifest_name: Option<String>,
    /// Report only one failure (true) or every failing file (false).
    pub fail_fast: bool,
    /// Size of the hashing worker pool.
    pub max_workers: usize,
    /// One worker per manifest entry, ignoring `max_workers`.
    #[serde(default)]
    pub unbounded: bool,
    /// Optional log settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub log: Option<LogConfig>,
}

impl Default for SigcheckConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha1,
            manifest_name: None,
            fail_fast: true,
            max_workers: 8,
            unbounded: false,
            log: None,
        }
    }
}

impl SigcheckConfig {
    pub fn manifest_name(&self) -> &str {
        self.manifest_name
            .as_deref()
            .unwrap_or_else(|| self.algorithm.manifest_name())
    }

    pub fn verify_options(&self) -> VerifyOptions {
        let concurrency = if self.unbounded {
            Concurrency::Unbounded
        } else {
            Concurrency::Bounded(self.max_workers.max(1))
        };
        VerifyOptions {
            fail_fast: self.fail_fast,
            concurrency,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sigcheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SigcheckConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SigcheckConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<SigcheckConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: SigcheckConfig = toml::from_str(&data)?;
    Ok(cfg)
}
