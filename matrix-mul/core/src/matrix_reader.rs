//! Loading of operand matrices from whitespace-separated text.
//!
//! Each non-blank line is one row. A line with fewer than N values ends its
//! row early and the remaining columns stay zero, as do rows missing at the
//! end of the input. Lines past the N-th row are ignored.

use crate::Matrix;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: `{token}` is not an integer")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {actual} values, a row holds at most {expected}")]
    RowTooLong {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid matrix in {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Parses an N×N matrix from text
pub fn parse_matrix(text: &str, size: usize) -> Result<Matrix, ParseError> {
    let mut matrix = Matrix::zeros(size);

    let lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .take(size);

    for (row, (index, line)) in lines.enumerate() {
        let line_no = index + 1;
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() > size {
            return Err(ParseError::RowTooLong {
                line: line_no,
                expected: size,
                actual: values.len(),
            });
        }

        for (col, value) in values.into_iter().enumerate() {
            matrix.set(row, col, value);
        }
    }

    Ok(matrix)
}

/// Reads and parses an N×N matrix file
pub async fn read_matrix_file(
    path: impl AsRef<Path>,
    size: usize,
) -> Result<Matrix, IngestError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse_matrix(&text, size).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
