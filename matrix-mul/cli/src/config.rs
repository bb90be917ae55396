use crate::error::Error;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the process-backend worker program
pub const ROW_WORKER_PROGRAM: &str = "matrix-mul-row-worker";

/// Largest accepted N: one worker per row, and an N×N matrix must fit in memory
pub const MAX_SIZE: usize = 4096;

/// Where row workers run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// tokio tasks talking over in-memory pipes
    #[default]
    Tasks,
    /// child processes talking over OS pipes
    Processes,
}

/// Run configuration, read from an optional JSON file
///
/// Every field is optional in the file; command-line flags override it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub size: usize,
    pub backend: Backend,
    pub deadline_ms: Option<u64>,
    pub worker_program: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 8,
            backend: Backend::Tasks,
            deadline_ms: None,
            worker_program: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `load` when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Rejects settings no run could satisfy
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_SIZE).contains(&self.size) {
            return Err(Error::InvalidSize {
                size: self.size,
                max: MAX_SIZE,
            });
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// The configured worker program, or the one installed next to this executable
    pub fn worker_program(&self) -> Result<PathBuf, Error> {
        if let Some(program) = &self.worker_program {
            return Ok(program.clone());
        }
        let exe = std::env::current_exe().map_err(Error::WorkerProgram)?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(format!("{ROW_WORKER_PROGRAM}{}", std::env::consts::EXE_SUFFIX)))
    }
}
