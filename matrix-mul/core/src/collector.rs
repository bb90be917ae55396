use crate::row_codec::read_row;
use crate::{EngineError, Matrix, Termination, WorkerHandle, WorkerId, WorkerRuntime};
use std::collections::HashMap;
use tokio::io::AsyncRead;
use tracing::{debug, error};

/// Merges worker rows into the product in whatever order workers finish
///
/// Rows are located through the handle of the worker that terminated, so the
/// n-th completion is never assumed to belong to the n-th spawned row.
pub struct Collector<R> {
    size: usize,
    outstanding: HashMap<WorkerId, WorkerHandle<R>>,
    completion_order: Vec<usize>,
}

impl<R: AsyncRead + Unpin> Collector<R> {
    pub fn new(size: usize, handles: Vec<WorkerHandle<R>>) -> Self {
        Self {
            size,
            outstanding: handles.into_iter().map(|h| (h.id(), h)).collect(),
            completion_order: Vec::new(),
        }
    }

    /// Number of workers whose termination has not been seen yet
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Rows merged so far, in the order their workers terminated
    pub fn completion_order(&self) -> &[usize] {
        &self.completion_order
    }

    /// Waits on `runtime` until every outstanding worker has been merged into `product`
    ///
    /// Stops at the first abnormal termination or channel failure.
    pub async fn collect<W>(
        &mut self,
        runtime: &mut W,
        product: &mut Matrix,
    ) -> Result<(), EngineError>
    where
        W: WorkerRuntime<Reader = R>,
    {
        while !self.outstanding.is_empty() {
            let Some(event) = runtime.wait_next().await else {
                return Err(EngineError::Incomplete {
                    merged: self.completion_order.len(),
                    expected: self.completion_order.len() + self.outstanding.len(),
                });
            };

            match event {
                Termination::Completed(worker) => self.merge(worker, product).await?,
                Termination::Abnormal { worker, cause } => {
                    let row = self
                        .outstanding
                        .get(&worker)
                        .map(WorkerHandle::row)
                        .ok_or(EngineError::UnknownWorker(worker))?;
                    error!(%worker, row, %cause, "worker terminated abnormally");
                    return Err(EngineError::WorkerAbnormalTermination { worker, row, cause });
                }
            }
        }
        Ok(())
    }

    async fn merge(&mut self, worker: WorkerId, product: &mut Matrix) -> Result<(), EngineError> {
        let mut handle = self
            .outstanding
            .remove(&worker)
            .ok_or(EngineError::UnknownWorker(worker))?;
        let row = handle.row();

        let result = read_row(handle.reader_mut(), self.size)
            .await
            .map_err(|source| EngineError::ChannelIo { worker, row, source })?;
        // closes the reading end
        drop(handle);

        product.set_row(row, result.values());
        self.completion_order.push(row);
        debug!(%worker, row, merged = self.completion_order.len(), "merged row");
        Ok(())
    }
}
