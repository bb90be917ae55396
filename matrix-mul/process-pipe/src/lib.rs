//! Process backend: every row worker is a child process of the row-worker
//! program, answering on an anonymous pipe bound to its stdout.
//!
//! Unix only.

mod exit_status;
pub use exit_status::termination_of;

mod process_runtime;
pub use process_runtime::ProcessRuntime;

mod stdio_worker;
pub use stdio_worker::{serve, serve_stdio, WorkerError};

mod fault_injection;
pub use fault_injection::FaultInjection;
