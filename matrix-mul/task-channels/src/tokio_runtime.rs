use crate::row_worker::run_row_worker;
use matrix_mul_core::{
    DotProductKernel, RowKernel, RowTask, Termination, TerminationCause, WorkerId, WorkerRuntime,
};
use std::io;
use std::sync::Arc;
use tokio::io::DuplexStream;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Tokio task-based runtime
///
/// Channels are `tokio::io::duplex` pipes sized to one frame, so a worker
/// never waits for the collector to start reading. Termination events come
/// out of a `JoinSet` in completion order. `shutdown` cancels every kernel
/// and waits until each one has returned.
pub struct TaskRuntime<K: RowKernel = DotProductKernel> {
    kernel: Arc<K>,
    workers: JoinSet<(WorkerId, Result<(), TerminationCause>)>,
    next_id: u64,
    cancellation_token: CancellationToken,
}

impl TaskRuntime {
    pub fn new() -> Self {
        Self::with_kernel(DotProductKernel)
    }
}

impl Default for TaskRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RowKernel> TaskRuntime<K> {
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel: Arc::new(kernel),
            workers: JoinSet::new(),
            next_id: 0,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Total number of workers spawned so far
    pub fn spawned(&self) -> usize {
        self.next_id as usize
    }

    /// Workers whose termination has not been reported yet
    pub fn outstanding(&self) -> usize {
        self.workers.len()
    }
}

impl<K: RowKernel> WorkerRuntime for TaskRuntime<K> {
    type Writer = DuplexStream;
    type Reader = DuplexStream;

    fn open_channel(&mut self, payload_len: usize) -> io::Result<(DuplexStream, DuplexStream)> {
        Ok(tokio::io::duplex(payload_len.max(1)))
    }

    async fn spawn(&mut self, task: RowTask, writer: DuplexStream) -> io::Result<WorkerId> {
        let id = WorkerId::new(self.next_id);
        self.next_id += 1;

        let kernel = Arc::clone(&self.kernel);
        let cancel = self.cancellation_token.clone();
        self.workers.spawn(run_row_worker(id, kernel, task, writer, cancel));
        Ok(id)
    }

    async fn wait_next(&mut self) -> Option<Termination> {
        loop {
            match self.workers.join_next().await? {
                Ok((worker, Ok(()))) => return Some(Termination::Completed(worker)),
                Ok((worker, Err(cause))) => return Some(Termination::Abnormal { worker, cause }),
                Err(err) => warn!(%err, "row worker task lost"),
            }
        }
    }

    async fn shutdown(&mut self) {
        debug!(outstanding = self.workers.len(), "cancelling row workers");
        self.cancellation_token.cancel();
        while let Some(joined) = self.workers.join_next().await {
            if let Ok((worker, outcome)) = joined {
                debug!(%worker, ?outcome, "row worker stopped");
            }
        }
        self.cancellation_token = CancellationToken::new();
    }
}
