use std::io::BufRead;

use super::{Manifest, ManifestError};

/// Parse a manifest stream into a filename -> digest mapping.
///
/// Each non-blank line must split on whitespace into exactly two fields,
/// `<digest> <filename>`. Blank lines are skipped but still counted for the
/// 1-based line numbers reported in [`ManifestError::Malformed`]. A repeated
/// filename overwrites the earlier digest.
pub fn parse<R: BufRead>(reader: R) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::default();

    for (idx, line) in reader.lines().enumerate() {
        let lnum = idx + 1;
        let line = line.map_err(|source| ManifestError::Read { path: None, source })?;

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [digest, name] => {
                if let Some(prev) = manifest.insert((*name).to_string(), (*digest).to_string()) {
                    tracing::debug!(
                        line = lnum,
                        name = *name,
                        previous = %prev,
                        "duplicate manifest entry overwrites earlier digest"
                    );
                }
            }
            _ => {
                return Err(ManifestError::Malformed {
                    line: lnum,
                    text: line.clone(),
                })
            }
        }
    }

    Ok(manifest)
}
