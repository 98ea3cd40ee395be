//! Pluggable file digests.
//!
//! The verifier never names a hash algorithm directly: it asks a
//! [`HasherFactory`] for a fresh [`Hasher`] per file and streams bytes into it.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Read chunk size used when streaming a file through a hasher.
pub const BUF_SIZE: usize = 64 * 1024;

/// Incremental hash state for a single file.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Produces a fresh [`Hasher`] for every job. Shared across worker threads.
pub trait HasherFactory: Send + Sync {
    fn hasher(&self) -> Box<dyn Hasher>;
}

impl<F> HasherFactory for F
where
    F: Fn() -> Box<dyn Hasher> + Send + Sync,
{
    fn hasher(&self) -> Box<dyn Hasher> {
        self()
    }
}

/// Adapter from any RustCrypto `Digest` to [`Hasher`].
struct DigestHasher<D>(D);

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let DigestHasher(digest) = *self;
        digest.finalize().to_vec()
    }
}

/// Built-in digest algorithms. `Sha1` matches the conventional `sha1sum.txt` manifests.
/// Names are case-insensitive both on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Manifest file name conventionally found next to the data files.
    pub fn manifest_name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1sum.txt",
            DigestAlgorithm::Sha256 => "sha256sum.txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl HasherFactory for DigestAlgorithm {
    fn hasher(&self) -> Box<dyn Hasher> {
        match self {
            DigestAlgorithm::Sha1 => Box::new(DigestHasher(Sha1::new())),
            DigestAlgorithm::Sha256 => Box::new(DigestHasher(Sha256::new())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, thiserror::Error)]
#[error("unsupported digest algorithm: {0:?} (expected sha1 or sha256)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for DigestAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = UnknownAlgorithm;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Stream `reader` through a fresh hasher and return the digest as lowercase hex.
/// Reads in `BUF_SIZE` chunks so memory use does not grow with input size.
pub fn digest_reader<R: Read>(mut reader: R, factory: &dyn HasherFactory) -> io::Result<String> {
    let mut hasher = factory.hasher();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the digest of the file at `path` as lowercase hex.
pub fn digest_path(path: &Path, factory: &dyn HasherFactory) -> io::Result<String> {
    let f = File::open(path)?;
    digest_reader(f, factory)
}
