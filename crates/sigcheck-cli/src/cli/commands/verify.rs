//! `sigcheck verify` – check a directory against its manifest.

use anyhow::{Context, Result};
use sigcheck_core::config::SigcheckConfig;
use sigcheck_core::Verifier;
use std::path::Path;

use super::resolve_algorithm;

/// Flags that override the loaded config for one run.
#[derive(Debug, Default)]
pub struct VerifyArgs {
    pub manifest: Option<String>,
    pub algorithm: Option<String>,
    pub jobs: Option<usize>,
    pub unbounded: bool,
    pub collect_all: bool,
}

/// Merge command-line overrides into a copy of the config.
pub(crate) fn effective_config(cfg: &SigcheckConfig, args: &VerifyArgs) -> Result<SigcheckConfig> {
    let mut cfg = cfg.clone();
    cfg.algorithm = resolve_algorithm(args.algorithm.as_deref(), cfg.algorithm)?;
    if let Some(name) = &args.manifest {
        cfg.manifest_name = Some(name.clone());
    }
    if let Some(n) = args.jobs {
        cfg.max_workers = n;
        cfg.unbounded = false;
    }
    if args.unbounded {
        cfg.unbounded = true;
    }
    if args.collect_all {
        cfg.fail_fast = false;
    }
    Ok(cfg)
}

pub fn run_verify(cfg: &SigcheckConfig, dir: &Path, args: VerifyArgs) -> Result<()> {
    let cfg = effective_config(cfg, &args)?;
    let options = cfg.verify_options();
    tracing::info!(
        dir = %dir.display(),
        manifest = cfg.manifest_name(),
        algorithm = %cfg.algorithm,
        fail_fast = options.fail_fast,
        workers = ?options.concurrency,
        "verify"
    );

    // Failures are listed once, by the error's Display.
    let summary = Verifier::new(cfg.algorithm)
        .with_options(options)
        .verify_dir(dir, cfg.manifest_name())
        .with_context(|| format!("verify {}", dir.display()))?;
    println!(
        "OK: {} file(s) verified in {}",
        summary.files_checked,
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigcheck_core::Concurrency;

    #[test]
    fn flags_override_config() {
        let cfg = SigcheckConfig::default();
        let args = VerifyArgs {
            manifest: Some("SUMS".into()),
            algorithm: Some("sha256".into()),
            jobs: Some(3),
            unbounded: false,
            collect_all: true,
        };
        let eff = effective_config(&cfg, &args).unwrap();
        assert_eq!(eff.manifest_name(), "SUMS");
        assert_eq!(eff.algorithm, sigcheck_core::DigestAlgorithm::Sha256);
        assert!(!eff.fail_fast);
        assert_eq!(eff.verify_options().concurrency, Concurrency::Bounded(3));
    }

    #[test]
    fn no_flags_keep_config() {
        let cfg = SigcheckConfig {
            unbounded: true,
            ..SigcheckConfig::default()
        };
        let eff = effective_config(&cfg, &VerifyArgs::default()).unwrap();
        assert_eq!(eff, cfg);
    }

    #[test]
    fn unknown_algorithm_flag_is_error() {
        let args = VerifyArgs {
            algorithm: Some("crc32".into()),
            ..VerifyArgs::default()
        };
        assert!(effective_config(&SigcheckConfig::default(), &args).is_err());
    }

    #[test]
    fn run_verify_passes_on_intact_dir_and_fails_on_tampered() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        std::fs::write(&file, b"hello\n").unwrap();
        std::fs::write(
            dir.path().join("sha1sum.txt"),
            "f572d396fae9206628714fb2ce00f72e94f2258f  a.csv\n",
        )
        .unwrap();
        let cfg = SigcheckConfig::default();

        run_verify(&cfg, dir.path(), VerifyArgs::default()).unwrap();

        std::fs::write(&file, b"bye\n").unwrap();
        let err = run_verify(&cfg, dir.path(), VerifyArgs::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("mismatch"));
    }

    #[test]
    fn collect_all_reports_each_failing_file_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.csv"), b"hello\n").unwrap();
        std::fs::write(dir.path().join("b.csv"), b"changed\n").unwrap();
        std::fs::write(
            dir.path().join("sha1sum.txt"),
            "f572d396fae9206628714fb2ce00f72e94f2258f  a.csv\n\
             f572d396fae9206628714fb2ce00f72e94f2258f  b.csv\n\
             da39a3ee5e6b4b0d3255bfef95601890afd80709  gone.csv\n",
        )
        .unwrap();
        let args = VerifyArgs {
            collect_all: true,
            ..VerifyArgs::default()
        };

        let err = run_verify(&SigcheckConfig::default(), dir.path(), args).unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("2 file(s) failed verification"));
        assert_eq!(rendered.matches("b.csv").count(), 1);
        assert_eq!(rendered.matches("gone.csv").count(), 1);
        assert!(!rendered.contains("a.csv"));
    }
}
