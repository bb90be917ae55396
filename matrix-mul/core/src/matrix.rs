use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Square matrix of signed integers stored in row-major order
///
/// Serialized as a list of rows so that a worker receiving it over a pipe
/// can validate the shape before computing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Matrix {
    size: usize,
    cells: Vec<i64>,
}

impl Matrix {
    /// Creates an N×N matrix filled with zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            matrix.cells[i * size + i] = 1;
        }
        matrix
    }

    /// Builds a matrix from its rows
    /// Fails unless there are exactly as many rows as each row has columns
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, ShapeError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ShapeError {
                    row: index,
                    expected: size,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.cells[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i64] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Overwrites one full row
    ///
    /// # Panics
    /// Panics if `values` is not exactly `size` long.
    pub fn set_row(&mut self, row: usize, values: &[i64]) {
        let start = row * self.size;
        self.cells[start..start + self.size].copy_from_slice(values);
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        // chunks(0) panics, an empty matrix has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.rows().map(<[i64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<i64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.to_rows()
    }
}

/// A row whose length does not match the number of rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row} has {actual} columns, expected {expected}")]
pub struct ShapeError {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}
