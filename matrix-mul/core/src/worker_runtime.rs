use crate::{RowTask, Termination, WorkerId};
use std::future::Future;
use std::io;
use tokio::io::AsyncRead;

/// Trait for abstracting how row workers run (tasks, processes)
/// A runtime owns every worker it spawns until that worker's termination
/// has been reported by `wait_next` or `shutdown` has reaped it
pub trait WorkerRuntime: Send {
    /// Writing end of a channel, moved into the worker
    type Writer: Send + 'static;

    /// Reading end of a channel, kept by the collector
    type Reader: AsyncRead + Unpin + Send + 'static;

    /// Create a fresh one-shot channel able to buffer `payload_len` bytes
    /// without a reader attached
    fn open_channel(&mut self, payload_len: usize) -> io::Result<(Self::Writer, Self::Reader)>;

    /// Spawn a worker computing `task` and emitting its row on `writer`
    fn spawn(
        &mut self,
        task: RowTask,
        writer: Self::Writer,
    ) -> impl Future<Output = io::Result<WorkerId>> + Send;

    /// Wait for whichever outstanding worker terminates next
    /// Returns None once no workers remain
    fn wait_next(&mut self) -> impl Future<Output = Option<Termination>> + Send;

    /// Terminate every outstanding worker and close every channel it still holds
    fn shutdown(&mut self) -> impl Future<Output = ()> + Send;
}
