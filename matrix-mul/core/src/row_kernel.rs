use crate::{RowResult, RowTask};
use tokio_util::sync::CancellationToken;

/// Computation a worker performs on its task
/// Runtimes are generic over it so tests can slow down or crash single rows
pub trait RowKernel: Send + Sync + 'static {
    /// Returns None when `cancel` fired before the row was complete
    fn compute(&self, task: &RowTask, cancel: &CancellationToken) -> Option<RowResult>;
}

/// R[r][c] = Σ_k A[r][k] · W[k][c], with wrapping `i64` arithmetic
///
/// Checks for cancellation before every column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotProductKernel;

impl RowKernel for DotProductKernel {
    fn compute(&self, task: &RowTask, cancel: &CancellationToken) -> Option<RowResult> {
        let rhs = task.rhs();
        let mut values = Vec::with_capacity(rhs.size());
        for col in 0..rhs.size() {
            if cancel.is_cancelled() {
                return None;
            }
            let sum = task
                .lhs_row()
                .iter()
                .enumerate()
                .fold(0i64, |acc, (k, &lhs)| {
                    acc.wrapping_add(lhs.wrapping_mul(rhs.get(k, col)))
                });
            values.push(sum);
        }
        Some(RowResult::new(values))
    }
}
