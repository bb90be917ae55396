use std::fmt;
use thiserror::Error;

/// Opaque identity of a spawned worker
///
/// Runtimes choose the value (a counter for tasks, the pid for processes);
/// the engine only compares and prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event yielded by a runtime when one of its workers stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The worker reached its success path; its row is waiting on the channel
    Completed(WorkerId),
    /// The worker crashed, was killed or could not deliver its row
    Abnormal {
        worker: WorkerId,
        cause: TerminationCause,
    },
}

impl Termination {
    pub fn worker(&self) -> WorkerId {
        match self {
            Termination::Completed(worker) => *worker,
            Termination::Abnormal { worker, .. } => *worker,
        }
    }
}

/// Why a worker did not reach its success path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminationCause {
    #[error("panicked: {0}")]
    Panicked(String),

    #[error("cancelled before completion")]
    Cancelled,

    #[error("exited with status {0}")]
    Exited(i32),

    #[error("killed by signal {0}")]
    Signaled(i32),

    #[error("failed to write its row: {0}")]
    ChannelWrite(String),

    #[error("could not be waited on: {0}")]
    Wait(String),
}
