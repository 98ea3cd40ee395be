//! Concurrent manifest-driven directory integrity verification.
//!
//! A directory holds data files plus a manifest (`sha1sum.txt` by default)
//! of `<digest> <filename>` lines. [`verifier::Verifier`] hashes every listed
//! file on a worker pool and reports whether they all match.

pub mod checksum;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod verifier;

pub use checksum::{DigestAlgorithm, Hasher, HasherFactory};
pub use manifest::{Manifest, ManifestError};
pub use verifier::{
    check_signatures, Concurrency, FileFailure, Verifier, VerifyError, VerifyOptions,
    VerifySummary,
};
