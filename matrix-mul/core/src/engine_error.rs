//! Fatal conditions of the fan-out/collect engine.

use crate::row_codec::RowCodecError;
use crate::{TerminationCause, WorkerId};
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("matrix dimension mismatch: A is {lhs}x{lhs}, W is {rhs}x{rhs}")]
    DimensionMismatch { lhs: usize, rhs: usize },

    #[error("failed to create channel for row {row}: {source}")]
    ChannelCreation { row: usize, source: io::Error },

    #[error("failed to spawn worker for row {row}: {source}")]
    Spawn { row: usize, source: io::Error },

    #[error("worker {worker} (row {row}) terminated abnormally: {cause}")]
    WorkerAbnormalTermination {
        worker: WorkerId,
        row: usize,
        #[source]
        cause: TerminationCause,
    },

    #[error("channel of worker {worker} (row {row}) failed: {source}")]
    ChannelIo {
        worker: WorkerId,
        row: usize,
        source: RowCodecError,
    },

    #[error("termination reported for unknown worker {0}")]
    UnknownWorker(WorkerId),

    #[error("runtime ran out of workers after merging {merged} of {expected} rows")]
    Incomplete { merged: usize, expected: usize },

    #[error("computation exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("computation cancelled")]
    Cancelled,
}
