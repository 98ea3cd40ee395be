//! Concurrent verification of a directory against its manifest.
//!
//! One job per manifest entry: open the file under the root, stream it through
//! the configured hasher, compare against the expected digest. Jobs run on a
//! worker pool and never wait on one another. The batch returns only after
//! every job has finished, even when some have already failed.

mod error;
mod outcome;
mod pool;

use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::checksum::{digest_path, DigestAlgorithm, HasherFactory};
use crate::manifest::{Manifest, DEFAULT_MANIFEST_NAME};

pub use error::{FileFailure, VerifyError};

/// How many files may be hashed at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// At most `n` worker threads (values below 1 are treated as 1).
    Bounded(usize),
    /// One worker per manifest entry. Open files grow with manifest size.
    Unbounded,
}

impl Default for Concurrency {
    fn default() -> Self {
        let n = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4);
        Concurrency::Bounded(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Surface one failure (`true`) or every failure (`false`).
    pub fail_fast: bool,
    pub concurrency: Concurrency,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            fail_fast: true,
            concurrency: Concurrency::default(),
        }
    }
}

/// Result of a fully successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifySummary {
    pub files_checked: usize,
}

/// One file to check.
#[derive(Debug)]
pub(crate) struct Job {
    pub(crate) path: PathBuf,
    pub(crate) expected: String,
}

/// Join a manifest name onto `root`, keeping the result inside `root`.
///
/// Root and prefix components are dropped, `.` is ignored, and `..` only
/// pops components contributed by `name` itself.
pub(crate) fn resolve_under(root: &Path, name: &str) -> PathBuf {
    let mut rel = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::ParentDir => {
                rel.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    root.join(rel)
}

fn check_one(job: &Job, factory: &dyn HasherFactory) -> Result<(), FileFailure> {
    let actual = digest_path(&job.path, factory).map_err(|source| FileFailure::Io {
        path: job.path.clone(),
        source,
    })?;
    if actual != job.expected {
        return Err(FileFailure::DigestMismatch {
            path: job.path.clone(),
            expected: job.expected.clone(),
            actual,
        });
    }
    Ok(())
}

/// Verifies directories with an injected digest capability.
#[derive(Clone)]
pub struct Verifier {
    factory: Arc<dyn HasherFactory>,
    options: VerifyOptions,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default())
    }
}

impl Verifier {
    pub fn new<F: HasherFactory + 'static>(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            options: VerifyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Check every manifest entry under `root`.
    ///
    /// In fail-fast mode the error carries exactly one failing file; when
    /// several fail concurrently, which one is unspecified.
    pub fn verify(&self, root: &Path, manifest: &Manifest) -> Result<VerifySummary, VerifyError> {
        if manifest.is_empty() {
            tracing::debug!(root = %root.display(), "empty manifest; nothing to verify");
            return Ok(VerifySummary { files_checked: 0 });
        }

        let jobs: Vec<Job> = manifest
            .iter()
            .map(|(name, expected)| Job {
                path: resolve_under(root, name),
                expected: expected.to_string(),
            })
            .collect();

        let workers = match self.options.concurrency {
            Concurrency::Bounded(n) => n.max(1),
            Concurrency::Unbounded => jobs.len(),
        };

        let summary = pool::run_pool(
            jobs,
            workers,
            Arc::clone(&self.factory),
            self.options.fail_fast,
        )?;
        tracing::info!(
            root = %root.display(),
            files = summary.files_checked,
            "all files verified"
        );
        Ok(summary)
    }

    /// Load `root/manifest_name` and verify it. Manifest errors abort before
    /// any file is opened.
    pub fn verify_dir(
        &self,
        root: &Path,
        manifest_name: &str,
    ) -> Result<VerifySummary, VerifyError> {
        let manifest = Manifest::load(root, manifest_name)?;
        self.verify(root, &manifest)
    }
}

/// Verify `root/sha1sum.txt` with SHA-1, fail-fast, on a bounded pool.
pub fn check_signatures(root: &Path) -> Result<VerifySummary, VerifyError> {
    Verifier::default().verify_dir(root, DEFAULT_MANIFEST_NAME)
}
