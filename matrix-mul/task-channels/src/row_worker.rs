use matrix_mul_core::row_codec::write_row;
use matrix_mul_core::{RowKernel, RowTask, TerminationCause, WorkerId};
use std::any::Any;
use std::sync::Arc;
use tokio::io::DuplexStream;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Body of one row worker task
///
/// The kernel runs on the blocking pool so rows are computed in parallel
/// and a panicking kernel is reported instead of tearing down the task.
/// Blocking work cannot be aborted, so the kernel watches `cancel` instead.
pub(crate) async fn run_row_worker<K: RowKernel>(
    id: WorkerId,
    kernel: Arc<K>,
    task: RowTask,
    writer: DuplexStream,
    cancel: CancellationToken,
) -> (WorkerId, Result<(), TerminationCause>) {
    let row = task.row();
    let computed = tokio::task::spawn_blocking(move || kernel.compute(&task, &cancel)).await;
    let result = match computed {
        Ok(Some(result)) => result,
        Ok(None) => {
            trace!(worker = %id, row, "row abandoned on cancellation");
            return (id, Err(TerminationCause::Cancelled));
        }
        Err(err) if err.is_panic() => {
            return (id, Err(TerminationCause::Panicked(panic_message(err.into_panic()))));
        }
        Err(_) => return (id, Err(TerminationCause::Cancelled)),
    };
    trace!(worker = %id, row, "row computed");

    let outcome = write_row(writer, &result)
        .await
        .map_err(|e| TerminationCause::ChannelWrite(e.to_string()));
    (id, outcome)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
