//! Row-parallel product of square integer matrices.
//!
//! One worker per output row computes `R[r] = A[r] · W` and sends the row back
//! over its own one-shot channel. The [`Orchestrator`] fans the rows out
//! through a [`WorkerRuntime`], then merges results in completion order,
//! locating each row through the handle of the worker that produced it.

mod matrix;
pub use matrix::{Matrix, ShapeError};

mod row_task;
pub use row_task::{RowResult, RowTask};

mod termination;
pub use termination::{Termination, TerminationCause, WorkerId};

mod worker_handle;
pub use worker_handle::WorkerHandle;

mod engine_error;
pub use engine_error::EngineError;

pub mod row_codec;
pub use row_codec::RowCodecError;

mod row_kernel;
pub use row_kernel::{DotProductKernel, RowKernel};

mod worker_runtime;
pub use worker_runtime::WorkerRuntime;

mod dispatcher;
pub use dispatcher::dispatch;

mod collector;
pub use collector::Collector;

mod orchestrator;
pub use orchestrator::{Orchestrator, Phase, RunOutcome};

pub mod matrix_reader;
pub use matrix_reader::{read_matrix_file, IngestError};

mod report;
pub use report::ProductReport;
