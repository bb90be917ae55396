use clap::Parser;
use matrix_mul::config::{Backend, Config};
use matrix_mul::error::Error;
use matrix_mul::logging;
use matrix_mul_core::{read_matrix_file, Matrix, Orchestrator, ProductReport, WorkerRuntime};
use matrix_mul_process_pipe::ProcessRuntime;
use matrix_mul_task_channels::TaskRuntime;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Multiplies two square integer matrices with one worker per output row
#[derive(Debug, Parser)]
#[command(name = "matrix-mul", version)]
struct Args {
    /// Left operand A, one whitespace-separated row per line
    matrix_a: PathBuf,

    /// Right operand W, same layout as A
    matrix_w: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Matrix dimension N
    #[arg(short = 'n', long)]
    size: Option<usize>,

    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Abort the computation after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Row-worker executable for the processes backend
    #[arg(long)]
    worker_program: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<Config, Error> {
        let mut config = Config::load_or_default(self.config.as_deref())?;
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if self.deadline_ms.is_some() {
            config.deadline_ms = self.deadline_ms;
        }
        if self.worker_program.is_some() {
            config.worker_program = self.worker_program.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Instant::now();
    let args = Args::parse();

    match run(args, start_time).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, start_time: Instant) -> Result<(), Error> {
    let config = args.resolve_config()?;
    logging::init(&config.log_filter);
    info!(?config, "configuration resolved");

    // both operands are loaded before any worker exists
    let a = read_matrix_file(&args.matrix_a, config.size).await?;
    let w = Arc::new(read_matrix_file(&args.matrix_w, config.size).await?);

    let product = match config.backend {
        Backend::Tasks => multiply(TaskRuntime::new(), config.deadline(), &a, w).await?,
        Backend::Processes => {
            let runtime = ProcessRuntime::new(config.worker_program()?);
            multiply(runtime, config.deadline(), &a, w).await?
        }
    };

    print!("{}", ProductReport::new(&product, start_time.elapsed()));
    Ok(())
}

async fn multiply<R: WorkerRuntime>(
    runtime: R,
    deadline: Option<Duration>,
    a: &Matrix,
    w: Arc<Matrix>,
) -> Result<Matrix, Error> {
    let mut orchestrator = Orchestrator::new(runtime);
    if let Some(limit) = deadline {
        orchestrator = orchestrator.with_deadline(limit);
    }

    let ctrl_c_token = orchestrator.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let result = orchestrator.run(a, w).await;
    ctrl_c.abort();

    let outcome = result?;
    info!(
        workers = outcome.workers_spawned,
        rows = outcome.rows_merged,
        "product assembled"
    );
    Ok(outcome.product)
}
