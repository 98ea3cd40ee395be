//! Logging init from the `[log]` config section.
//!
//! `RUST_LOG` wins over the configured filter. When the log file cannot be
//! opened, output goes to stderr instead so verification still runs.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "info,sigcheck=debug,sigcheck_core=debug";
const LOG_FILE_NAME: &str = "sigcheck.log";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Parse the configured filter directives, or the built-in default when none are set.
pub fn config_filter(cfg: Option<&LogConfig>) -> Result<EnvFilter> {
    let directives = cfg
        .and_then(|c| c.filter.as_deref())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))
}

fn env_filter(cfg: Option<&LogConfig>) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => config_filter(cfg),
    }
}

/// `$XDG_STATE_HOME/sigcheck`.
pub fn log_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sigcheck")?;
    Ok(xdg_dirs.get_state_home().join("sigcheck"))
}

/// Create `dir` if needed and open `dir/sigcheck.log` for appending.
pub fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok((file, path))
}

/// Install the global subscriber. Fails on a bad filter or if a subscriber is
/// already installed; an unusable log file only downgrades to stderr.
pub fn init_logging(cfg: Option<&LogConfig>) -> Result<LogTarget> {
    let filter = env_filter(cfg)?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    let mut file_err = None;
    if cfg.map_or(true, |c| c.to_file) {
        match log_dir().and_then(|dir| open_log_file(&dir)) {
            Ok((file, path)) => {
                subscriber
                    .with_writer(Mutex::new(file))
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;
                tracing::info!("sigcheck logging initialized at {}", path.display());
                return Ok(LogTarget::File(path));
            }
            Err(e) => file_err = Some(e),
        }
    }

    subscriber
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;
    if let Some(e) = file_err {
        tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
    }
    Ok(LogTarget::Stderr)
}

/// Stderr logging with the default filter. Use when init_logging() fails so the CLI doesn't crash.
pub fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
