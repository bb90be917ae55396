use crate::Matrix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input handed to the worker that owns one output row
///
/// The right operand is shared read-only: every worker needs all of W
/// to produce its row, none of them may change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowTask {
    row: usize,
    lhs_row: Vec<i64>,
    rhs: Arc<Matrix>,
}

impl RowTask {
    pub fn new(row: usize, lhs_row: Vec<i64>, rhs: Arc<Matrix>) -> Self {
        Self { row, lhs_row, rhs }
    }

    /// Index of the output row this task produces
    pub fn row(&self) -> usize {
        self.row
    }

    /// Row `row` of the left operand A
    pub fn lhs_row(&self) -> &[i64] {
        &self.lhs_row
    }

    /// The full right operand W
    pub fn rhs(&self) -> &Matrix {
        &self.rhs
    }

    pub fn size(&self) -> usize {
        self.rhs.size()
    }

    /// True when the row vector fits the right operand and the row index is in range
    pub fn is_consistent(&self) -> bool {
        self.lhs_row.len() == self.rhs.size() && self.row < self.rhs.size()
    }
}

/// One computed output row, R[r][0..N]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult(Vec<i64>);

impl RowResult {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<i64> {
        self.0
    }
}

impl From<Vec<i64>> for RowResult {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}
