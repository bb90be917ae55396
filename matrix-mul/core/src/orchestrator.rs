use crate::collector::Collector;
use crate::dispatcher::dispatch;
use crate::{EngineError, Matrix, WorkerRuntime};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Lifecycle of one computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Dispatching,
    Collecting,
    Done,
    Failed,
}

/// Product of a successful run together with what it took to get there
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub product: Matrix,
    pub workers_spawned: usize,
    pub rows_merged: usize,
    /// Row indices in the order their workers terminated
    pub completion_order: Vec<usize>,
}

/// Orchestrator sequences dispatch, collection and failure handling
/// Generic over the runtime that actually executes the row workers
pub struct Orchestrator<R: WorkerRuntime> {
    runtime: R,
    phase: Phase,
    deadline: Option<Duration>,
    cancellation_token: CancellationToken,
}

impl<R: WorkerRuntime> Orchestrator<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            phase: Phase::Loading,
            deadline: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Bounds the whole dispatch + collect sequence in wall-clock time
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns a clone of the cancellation token for external control
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Computes `lhs × rhs` with one worker per output row
    ///
    /// On any fatal condition every outstanding worker is shut down before the
    /// error is returned, and no partial product escapes.
    pub async fn run(
        &mut self,
        lhs: &Matrix,
        rhs: Arc<Matrix>,
    ) -> Result<RunOutcome, EngineError> {
        if lhs.size() != rhs.size() {
            enter(&mut self.phase, Phase::Failed);
            return Err(EngineError::DimensionMismatch {
                lhs: lhs.size(),
                rhs: rhs.size(),
            });
        }

        let deadline = self.deadline;
        let token = self.cancellation_token.clone();
        let result = {
            let work = fan_out_collect(&mut self.runtime, &mut self.phase, lhs, &rhs);
            let bounded = async move {
                match deadline {
                    Some(limit) => tokio::time::timeout(limit, work)
                        .await
                        .unwrap_or_else(|_| Err(EngineError::DeadlineExceeded(limit))),
                    None => work.await,
                }
            };

            tokio::select! {
                result = bounded => result,
                _ = token.cancelled() => Err(EngineError::Cancelled),
            }
        };

        match result {
            Ok(outcome) => {
                enter(&mut self.phase, Phase::Done);
                Ok(outcome)
            }
            Err(err) => {
                enter(&mut self.phase, Phase::Failed);
                error!(%err, "computation failed, shutting down outstanding workers");
                self.runtime.shutdown().await;
                Err(err)
            }
        }
    }
}

async fn fan_out_collect<R: WorkerRuntime>(
    runtime: &mut R,
    phase: &mut Phase,
    lhs: &Matrix,
    rhs: &Arc<Matrix>,
) -> Result<RunOutcome, EngineError> {
    let size = lhs.size();

    enter(phase, Phase::Dispatching);
    let handles = dispatch(runtime, lhs, rhs).await?;
    let workers_spawned = handles.len();
    info!(workers = workers_spawned, "all row workers spawned");

    enter(phase, Phase::Collecting);
    let mut product = Matrix::zeros(size);
    let mut collector = Collector::new(size, handles);
    collector.collect(runtime, &mut product).await?;

    let completion_order = collector.completion_order().to_vec();
    Ok(RunOutcome {
        product,
        workers_spawned,
        rows_merged: completion_order.len(),
        completion_order,
    })
}

fn enter(phase: &mut Phase, next: Phase) {
    info!(from = ?*phase, to = ?next, "phase transition");
    *phase = next;
}
