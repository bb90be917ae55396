//! Row worker of the processes backend.
//!
//! Reads one JSON `RowTask` on stdin and writes the length-prefixed row to
//! stdout. Exits non-zero when the task cannot be served.

use clap::Parser;
use matrix_mul::logging;
use matrix_mul_core::DotProductKernel;
use matrix_mul_process_pipe::{serve_stdio, FaultInjection};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "matrix-mul-row-worker", version)]
struct Args {
    /// Abort instead of answering when handed this row
    #[arg(long, hide = true)]
    abort_row: Option<usize>,

    /// Delay row r by (N - r) times this many milliseconds
    #[arg(long, hide = true)]
    stagger_ms: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init("warn");

    let kernel = FaultInjection::new(DotProductKernel)
        .abort_on_row(args.abort_row)
        .stagger(args.stagger_ms.map(Duration::from_millis));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(%err, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(serve_stdio(&kernel)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "row worker failed");
            ExitCode::FAILURE
        }
    }
}
