//! Vertex index lists: one integer per line.
//!
//! Two parsing policies are offered. [`IndexParsing::Lenient`] reads each line
//! the way C's `atoi` does, so any file produces a list: leading whitespace
//! and an optional sign are accepted, the longest run of digits is used, and
//! a line without digits reads as `0`. Negative values map to `usize::MAX`,
//! which no mesh can hold, so they are rejected later as out of range.
//! [`IndexParsing::Strict`] skips blank lines and rejects anything else that
//! is not a plain non-negative integer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{MeshError, Result};

/// How lines of an index file are turned into indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexParsing {
    /// `atoi` rules; never fails on content.
    #[default]
    Lenient,
    /// Every non-blank line must be a non-negative integer.
    Strict,
}

impl FromStr for IndexParsing {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(IndexParsing::Lenient),
            "strict" => Ok(IndexParsing::Strict),
            _ => Err(MeshError::invalid_param(
                "index_parsing",
                s,
                "expected 'lenient' or 'strict'",
            )),
        }
    }
}

/// Read an index file from disk.
pub fn read_indices<P: AsRef<Path>>(path: P, parsing: IndexParsing) -> Result<Vec<usize>> {
    let path = path.as_ref();
    let indices = parse_indices(BufReader::new(File::open(path)?), parsing)?;
    log::debug!("read {} indices from {}", indices.len(), path.display());
    Ok(indices)
}

/// Parse indices from any line-oriented reader.
pub fn parse_indices<R: BufRead>(reader: R, parsing: IndexParsing) -> Result<Vec<usize>> {
    let mut indices = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match parsing {
            IndexParsing::Lenient => {
                let (value, clean) = atoi(&line);
                if !clean {
                    log::warn!("line {}: '{}' read as {}", i + 1, line.trim(), display_index(value));
                }
                indices.push(value);
            }
            IndexParsing::Strict => {
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                let value = text.parse::<usize>().map_err(|_| MeshError::ParseIndex {
                    line: i + 1,
                    text: text.to_string(),
                })?;
                indices.push(value);
            }
        }
    }

    Ok(indices)
}

/// Parse one line with `atoi` rules.
pub fn parse_index_lenient(line: &str) -> usize {
    atoi(line).0
}

/// Returns the value and whether the whole line was a well-formed index.
fn atoi(line: &str) -> (usize, bool) {
    let trimmed = line.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: usize = 0;
    for b in rest[..digits].bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(b - b'0'));
    }

    let clean = digits > 0 && !negative && rest[digits..].trim().is_empty();
    if negative && value != 0 {
        (usize::MAX, false)
    } else {
        (value, clean)
    }
}

fn display_index(value: usize) -> String {
    if value == usize::MAX {
        "out of range".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoi_rules() {
        assert_eq!(parse_index_lenient("42"), 42);
        assert_eq!(parse_index_lenient("  7"), 7);
        assert_eq!(parse_index_lenient("+3"), 3);
        assert_eq!(parse_index_lenient("12abc"), 12);
        assert_eq!(parse_index_lenient("3.9"), 3);
        assert_eq!(parse_index_lenient("abc"), 0);
        assert_eq!(parse_index_lenient(""), 0);
        assert_eq!(parse_index_lenient("-0"), 0);
        assert_eq!(parse_index_lenient("-5"), usize::MAX);
        assert_eq!(parse_index_lenient("99999999999999999999999999"), usize::MAX);
    }

    #[test]
    fn test_lenient_file() {
        let text = "0\n5\nfoo\n\n  12 \n-1\n";
        let indices = parse_indices(text.as_bytes(), IndexParsing::Lenient).unwrap();
        assert_eq!(indices, vec![0, 5, 0, 0, 12, usize::MAX]);
    }

    #[test]
    fn test_strict_file() {
        let text = "0\n5\n\n  12 \n";
        let indices = parse_indices(text.as_bytes(), IndexParsing::Strict).unwrap();
        assert_eq!(indices, vec![0, 5, 12]);

        let result = parse_indices("1\n2\nthree\n".as_bytes(), IndexParsing::Strict);
        assert!(matches!(
            result,
            Err(MeshError::ParseIndex { line: 3, ref text }) if text == "three"
        ));

        let result = parse_indices("-1\n".as_bytes(), IndexParsing::Strict);
        assert!(matches!(result, Err(MeshError::ParseIndex { line: 1, .. })));
    }

    #[test]
    fn test_read_indices_from_disk() {
        let path = std::env::temp_dir().join(format!("pare_indices_{}.txt", std::process::id()));
        std::fs::write(&path, "3\n1\n4\n").unwrap();
        let indices = read_indices(&path, IndexParsing::Strict).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(indices, vec![3, 1, 4]);

        let missing = read_indices("/nonexistent/pare/indices.txt", IndexParsing::Lenient);
        assert!(matches!(missing, Err(MeshError::Io(_))));
    }

    #[test]
    fn test_parsing_from_str() {
        assert_eq!("strict".parse::<IndexParsing>().unwrap(), IndexParsing::Strict);
        assert_eq!("Lenient".parse::<IndexParsing>().unwrap(), IndexParsing::Lenient);
        assert!("loose".parse::<IndexParsing>().is_err());
    }
}
