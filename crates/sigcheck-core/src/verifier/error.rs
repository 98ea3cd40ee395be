//! Per-file failures and the aggregate verification error.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::manifest::ManifestError;

/// Why a single listed file failed verification.
#[derive(Debug, thiserror::Error)]
pub enum FileFailure {
    /// The file could not be opened or read to completion.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but its digest differs from the manifest.
    #[error("{:?} - mismatch (expected {expected}, got {actual})", .path.display().to_string())]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The hasher panicked while digesting the file.
    #[error("{}: hasher panicked: {message}", .path.display())]
    HasherPanicked { path: PathBuf, message: String },
}

impl FileFailure {
    pub fn path(&self) -> &Path {
        match self {
            FileFailure::Io { path, .. }
            | FileFailure::DigestMismatch { path, .. }
            | FileFailure::HasherPanicked { path, .. } => path,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, FileFailure::DigestMismatch { .. })
    }
}

/// Outcome of a failed verification run.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The manifest could not be loaded; nothing was checked.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Fail-fast mode: one of the failing files.
    #[error(transparent)]
    File(FileFailure),

    /// Collect-all mode: every failing file, sorted by path.
    #[error("{}", FailureList(.0))]
    Failures(Vec<FileFailure>),

    /// No worker thread could be started.
    #[error("spawn verification worker: {0}")]
    Spawn(#[source] io::Error),

    /// A worker thread died before reporting its result.
    #[error("verification worker panicked; {missing} file(s) left unchecked")]
    WorkerPanicked { missing: usize },
}

impl VerifyError {
    /// File failures carried by this error (empty for manifest and worker errors).
    pub fn failures(&self) -> &[FileFailure] {
        match self {
            VerifyError::File(f) => std::slice::from_ref(f),
            VerifyError::Failures(v) => v,
            VerifyError::Manifest(_)
            | VerifyError::Spawn(_)
            | VerifyError::WorkerPanicked { .. } => &[],
        }
    }
}

struct FailureList<'a>(&'a [FileFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} file(s) failed verification", self.0.len())?;
        for failure in self.0 {
            write!(f, "\n  {}", failure)?;
        }
        Ok(())
    }
}
