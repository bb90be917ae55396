//! Worker side of the process backend.

use matrix_mul_core::row_codec::write_row;
use matrix_mul_core::{RowCodecError, RowKernel, RowTask};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to read task: {0}")]
    Input(#[from] io::Error),

    #[error("malformed task: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("task for row {row} does not fit a {size}x{size} right operand")]
    Inconsistent { row: usize, size: usize },

    #[error("kernel gave up on row {0}")]
    Abandoned(usize),

    #[error("failed to emit row: {0}")]
    Emit(#[from] RowCodecError),
}

/// Reads one task from `input`, computes it and writes the framed row to `output`
pub async fn serve<I, O, K>(mut input: I, output: O, kernel: &K) -> Result<(), WorkerError>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
    K: RowKernel,
{
    let mut buf = Vec::new();
    input.read_to_end(&mut buf).await?;

    let task: RowTask = serde_json::from_slice(&buf)?;
    if !task.is_consistent() {
        return Err(WorkerError::Inconsistent {
            row: task.row(),
            size: task.size(),
        });
    }

    // the parent stops a process worker by killing it, never through the token
    let result = kernel
        .compute(&task, &CancellationToken::new())
        .ok_or(WorkerError::Abandoned(task.row()))?;
    write_row(output, &result).await?;
    debug!(row = task.row(), "row emitted");
    Ok(())
}

/// `serve` bound to the process's stdin and stdout
pub async fn serve_stdio<K: RowKernel>(kernel: &K) -> Result<(), WorkerError> {
    serve(tokio::io::stdin(), tokio::io::stdout(), kernel).await
}
