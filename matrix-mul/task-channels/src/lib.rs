//! Task backend: every row worker is a tokio task writing into an in-memory pipe.

mod row_worker;

mod tokio_runtime;
pub use tokio_runtime::TaskRuntime;
