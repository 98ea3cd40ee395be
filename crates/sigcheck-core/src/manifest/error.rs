//! Manifest loading and parsing errors.

use std::io;
use std::path::PathBuf;

/// Failure to obtain a usable manifest. Fatal: no verification job is launched.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest missing, unreadable, or the stream failed mid-scan.
    #[error("read manifest{}: {source}", display_path(.path))]
    Read {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// A line did not split into exactly `<digest> <filename>`.
    #[error("{line}: bad line: {text:?}")]
    Malformed { line: usize, text: String },
}

impl ManifestError {
    /// Attach the manifest path to a read error raised by a bare stream.
    pub(crate) fn with_path(self, manifest: PathBuf) -> Self {
        match self {
            ManifestError::Read { path: None, source } => ManifestError::Read {
                path: Some(manifest),
                source,
            },
            other => other,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
