use matrix_mul_core::{EngineError, IngestError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("size {size} is out of range, expected 1 to {max}")]
    InvalidSize { size: usize, max: usize },

    #[error("cannot locate the row-worker program: {0}")]
    WorkerProgram(io::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
