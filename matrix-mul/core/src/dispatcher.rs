use crate::row_codec::frame_len;
use crate::{EngineError, Matrix, RowTask, WorkerHandle, WorkerRuntime};
use std::sync::Arc;
use tracing::debug;

/// Spawns one worker per row of `lhs`, in row order
///
/// Each worker gets a fresh channel, row `r` of A and a shared reference to W.
/// The first failure stops the fan-out: later rows are never spawned and the
/// already-spawned workers are left for the caller to shut down.
pub async fn dispatch<R: WorkerRuntime>(
    runtime: &mut R,
    lhs: &Matrix,
    rhs: &Arc<Matrix>,
) -> Result<Vec<WorkerHandle<R::Reader>>, EngineError> {
    let size = lhs.size();
    let mut handles = Vec::with_capacity(size);

    for row in 0..size {
        let (writer, reader) = runtime
            .open_channel(frame_len(size))
            .map_err(|source| EngineError::ChannelCreation { row, source })?;

        let task = RowTask::new(row, lhs.row(row).to_vec(), Arc::clone(rhs));
        let id = runtime
            .spawn(task, writer)
            .await
            .map_err(|source| EngineError::Spawn { row, source })?;

        debug!(worker = %id, row, "spawned row worker");
        handles.push(WorkerHandle::new(id, row, reader));
    }

    Ok(handles)
}
