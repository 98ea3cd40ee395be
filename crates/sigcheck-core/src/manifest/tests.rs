//! Tests for manifest parsing and loading.

use std::io::{self, BufRead, BufReader, Read};

use super::{parse, Manifest, ManifestError};

fn digest_for<'a>(m: &'a Manifest, name: &str) -> Option<&'a str> {
    m.iter().find(|(n, _)| *n == name).map(|(_, d)| d)
}

#[test]
fn parses_digest_filename_pairs() {
    let input = "\
6c6427da7893932731901035edbb9214 nasa-00.log
0c4ccc63a912bbd6d45174251415c089522e5c0e  taxi-01.csv
";
    let m = parse(input.as_bytes()).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(digest_for(&m, "nasa-00.log"), Some("6c6427da7893932731901035edbb9214"));
    assert_eq!(
        digest_for(&m, "taxi-01.csv"),
        Some("0c4ccc63a912bbd6d45174251415c089522e5c0e")
    );
}

#[test]
fn arbitrary_whitespace_between_fields() {
    let m = parse("abc\t \t a.csv\n  def   b.csv  \n".as_bytes()).unwrap();
    assert_eq!(digest_for(&m, "a.csv"), Some("abc"));
    assert_eq!(digest_for(&m, "b.csv"), Some("def"));
}

#[test]
fn empty_stream_is_empty_manifest() {
    let m = parse("".as_bytes()).unwrap();
    assert!(m.is_empty());
}

#[test]
fn single_field_line_is_malformed_with_line_number() {
    let input = "aa a.csv\nbb b.csv\nlonely\n";
    match parse(input.as_bytes()) {
        Err(ManifestError::Malformed { line, text }) => {
            assert_eq!(line, 3);
            assert_eq!(text, "lonely");
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn trailing_field_is_malformed() {
    let err = parse("aa a.csv extra\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ManifestError::Malformed { line: 1, .. }));
    assert_eq!(err.to_string(), "1: bad line: \"aa a.csv extra\"");
}

#[test]
fn blank_lines_are_skipped_but_counted() {
    let input = "aa a.csv\n\n   \nbroken\n";
    let err = parse(input.as_bytes()).unwrap_err();
    assert!(matches!(err, ManifestError::Malformed { line: 4, .. }));

    let m = parse("aa a.csv\n\n\nbb b.csv\n".as_bytes()).unwrap();
    assert_eq!(m.len(), 2);
}

#[test]
fn duplicate_filename_keeps_last_digest() {
    let m = parse("11 a.csv\n22 a.csv\n".as_bytes()).unwrap();
    assert_eq!(m.len(), 1);
    assert_eq!(digest_for(&m, "a.csv"), Some("22"));
}

/// Yields one good line, then fails.
struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }
        self.served = true;
        let line = b"aa a.csv\n";
        buf[..line.len()].copy_from_slice(line);
        Ok(line.len())
    }
}

#[test]
fn stream_error_is_read_error_not_malformed() {
    let reader: Box<dyn BufRead> = Box::new(BufReader::new(FailingReader { served: false }));
    match parse(reader) {
        Err(ManifestError::Read { path, source }) => {
            assert!(path.is_none());
            assert_eq!(source.to_string(), "disk on fire");
        }
        other => panic!("expected Read, got {:?}", other),
    }
}

#[test]
fn load_missing_manifest_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    match Manifest::load(dir.path(), "sha1sum.txt") {
        Err(ManifestError::Read { path, source }) => {
            assert_eq!(path.unwrap(), dir.path().join("sha1sum.txt"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected Read, got {:?}", other),
    }
}

#[test]
fn load_reads_manifest_from_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sha1sum.txt"), "aa a.csv\nbb sub/b.csv\n").unwrap();
    let m = Manifest::load(dir.path(), "sha1sum.txt").unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(digest_for(&m, "sub/b.csv"), Some("bb"));
    let mut names: Vec<&str> = m.iter().map(|(name, _)| name).collect();
    names.sort();
    assert_eq!(names, ["a.csv", "sub/b.csv"]);
}
