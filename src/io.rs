//! Whitespace-separated text matrices.
//!
//! One row per line, integers separated by whitespace. `inf`, `x` or `-`
//! (any case) mark an unreachable edge. Blank lines and anything after `#`
//! are ignored. When the city count is given up front the tokens are read
//! row-major regardless of line breaks, as long as there are exactly `n * n`
//! of them.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::matrix::DistanceMatrix;
use crate::traits::MatrixProvider;

#[derive(Clone, Debug)]
enum Origin {
    Path(PathBuf),
    Inline(String),
}

/// Text-format [`MatrixProvider`] reading from a file or an owned string.
#[derive(Clone, Debug)]
pub struct TextSource {
    origin: Origin,
    expected: Option<usize>,
}

impl TextSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::Path(path.as_ref().to_path_buf()),
            expected: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Inline(text.into()),
            expected: None,
        }
    }

    /// Require exactly `n` cities instead of inferring the count from the
    /// number of rows.
    pub fn with_size(mut self, n: usize) -> Self {
        self.expected = Some(n);
        self
    }
}

impl MatrixProvider for TextSource {
    fn load(&self) -> Result<DistanceMatrix> {
        match &self.origin {
            Origin::Path(path) => {
                let text = fs::read_to_string(path)?;
                parse_matrix(&text, self.expected)
            }
            Origin::Inline(text) => parse_matrix(text, self.expected),
        }
    }
}

/// Read a text matrix from any reader.
pub fn read_matrix<R: Read>(mut reader: R, expected: Option<usize>) -> Result<DistanceMatrix> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_matrix(&text, expected)
}

/// Parse a text matrix; see the module docs for the format.
pub fn parse_matrix(text: &str, expected: Option<usize>) -> Result<DistanceMatrix> {
    let lines: Vec<Vec<&str>> = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect();

    let rows: Vec<Vec<&str>> = match expected {
        None => lines,
        Some(0) => return Err(Error::invalid("city count must be positive")),
        Some(n) => {
            let cells = n
                .checked_mul(n)
                .ok_or_else(|| Error::invalid(format!("{n} cities is too large a matrix")))?;
            let tokens: Vec<&str> = lines.into_iter().flatten().collect();
            if tokens.len() != cells {
                return Err(Error::invalid(format!(
                    "expected {cells} values for {n} cities, found {}",
                    tokens.len()
                )));
            }
            tokens.chunks(n).map(<[&str]>::to_vec).collect()
        }
    };
    if rows.is_empty() {
        return Err(Error::invalid("matrix input is empty"));
    }

    let entries = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, token)| parse_entry(token, i, j))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    DistanceMatrix::from_entries(&entries)
}

fn parse_entry(token: &str, row: usize, col: usize) -> Result<Option<i64>> {
    if token == "-" || token.eq_ignore_ascii_case("inf") || token.eq_ignore_ascii_case("x") {
        return Ok(None);
    }
    token.parse::<i64>().map(Some).map_err(|_| {
        Error::invalid(format!(
            "row {row}, column {col}: '{token}' is not an integer"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::INFINITY;

    #[test]
    fn rows_from_lines() {
        let m = parse_matrix("0 1 2\n3 0 4\n5 6 0\n", None).unwrap();
        assert_eq!(m.size(), 3);
        assert_eq!(m.cost(2, 1), 6);
    }

    #[test]
    fn comments_blank_lines_and_markers() {
        let text = "# three cities\n\n0 1 inf  # no direct 0->2\n1 0 X\n- 2 0\n";
        let m = parse_matrix(text, None).unwrap();
        assert_eq!(m.cost(0, 2), INFINITY);
        assert_eq!(m.cost(1, 2), INFINITY);
        assert_eq!(m.cost(2, 0), INFINITY);
        assert_eq!(m.cost(2, 1), 2);
    }

    #[test]
    fn explicit_size_ignores_line_breaks() {
        let m = parse_matrix("0 1\n2\n0", Some(2)).unwrap();
        assert_eq!(m.cost(1, 0), 2);
        assert!(parse_matrix("0 1 2 0 9", Some(2)).is_err());
        assert!(parse_matrix("0 1 2", Some(2)).is_err());
        assert!(parse_matrix("0", Some(0)).is_err());
    }

    #[test]
    fn oversized_explicit_size_is_rejected() {
        match parse_matrix("0", Some(1usize << 33)) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("too large"), "{msg}"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(matches!(
            parse_matrix("", Some(usize::MAX)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_tokens_name_their_position() {
        let err = parse_matrix("0 1\n2 abc\n", None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 1, column 1"), "{msg}");
        assert!(msg.contains("abc"));
    }

    #[test]
    fn ragged_and_empty_inputs() {
        assert!(matches!(
            parse_matrix("0 1\n2\n", None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            parse_matrix("  \n# nothing\n", None),
            Err(Error::InvalidInput(_))
        ));
        assert!(parse_matrix("0 -4\n1 0\n", None).is_err());
    }

    #[test]
    fn reader_and_inline_source_agree() {
        let text = "0 7\n8 0\n";
        let from_reader = read_matrix(text.as_bytes(), None).unwrap();
        let from_source = TextSource::from_text(text).with_size(2).load().unwrap();
        assert_eq!(from_reader, from_source);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TextSource::from_path("/definitely/not/here.txt")
            .load()
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
