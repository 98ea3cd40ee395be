//! Digest manifests: `<hex-digest> <relative-filename>` per line.
//!
//! Example (`sha1sum.txt`):
//!
//! ```text
//! 0c4ccc63a912bbd6d45174251415c089522e5c0e  taxi-01.csv
//! f427b5880e9164ec1e6cda53aa4b2d1f1e470da9  taxi-02.csv
//! ```

mod error;
mod parse;

use std::collections::hash_map;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use error::ManifestError;
pub use parse::parse;

/// Manifest name used with the default (SHA-1) digest.
pub const DEFAULT_MANIFEST_NAME: &str = "sha1sum.txt";

/// Expected digests keyed by filename relative to the verified root.
/// Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    /// Load and parse `root/name`. Fails before anything is hashed if the file
    /// is missing, unreadable, or malformed.
    pub fn load(root: &Path, name: &str) -> Result<Self, ManifestError> {
        let path = root.join(name);
        let file = File::open(&path).map_err(|source| ManifestError::Read {
            path: Some(path.clone()),
            source,
        })?;
        let manifest = parse(BufReader::new(file)).map_err(|e| e.with_path(path.clone()))?;
        tracing::debug!(path = %path.display(), entries = manifest.len(), "loaded manifest");
        Ok(manifest)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(filename, expected digest)` pairs in unspecified order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Later inserts for the same name replace earlier ones; returns the replaced digest.
    pub(crate) fn insert(&mut self, name: String, digest: String) -> Option<String> {
        self.entries.insert(name, digest)
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

pub struct Iter<'a>(hash_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
