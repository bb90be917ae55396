use matrix_mul_core::{RowKernel, RowResult, RowTask};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Kernel wrapper used to exercise the collector against misbehaving workers
///
/// `stagger` delays row `r` by `(N - r) * stagger`, so later rows finish first.
/// `abort_row` aborts the whole worker process when it is handed that row.
#[derive(Debug, Clone, Default)]
pub struct FaultInjection<K> {
    inner: K,
    abort_row: Option<usize>,
    stagger: Option<Duration>,
}

impl<K: RowKernel> FaultInjection<K> {
    pub fn new(inner: K) -> Self {
        Self {
            inner,
            abort_row: None,
            stagger: None,
        }
    }

    pub fn abort_on_row(mut self, row: Option<usize>) -> Self {
        self.abort_row = row;
        self
    }

    pub fn stagger(mut self, step: Option<Duration>) -> Self {
        self.stagger = step;
        self
    }
}

impl<K: RowKernel> RowKernel for FaultInjection<K> {
    fn compute(&self, task: &RowTask, cancel: &CancellationToken) -> Option<RowResult> {
        if let Some(step) = self.stagger {
            let remaining = task.size().saturating_sub(task.row()) as u32;
            std::thread::sleep(step * remaining);
        }
        if self.abort_row == Some(task.row()) {
            error!(row = task.row(), "aborting worker on request");
            std::process::abort();
        }
        self.inner.compute(task, cancel)
    }
}
