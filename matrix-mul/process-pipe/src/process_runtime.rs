use crate::exit_status::termination_of;
use matrix_mul_core::{RowTask, Termination, WorkerId, WorkerRuntime};
use std::ffi::OsString;
use std::io::{self, PipeWriter};
use std::os::fd::OwnedFd;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bytes an anonymous pipe buffers before its writer blocks
#[cfg(target_os = "linux")]
const PIPE_CAPACITY: usize = 64 * 1024;
#[cfg(not(target_os = "linux"))]
const PIPE_CAPACITY: usize = 16 * 1024;

/// Child process-based runtime
///
/// Each worker gets its task as JSON on stdin and writes its row to stdout,
/// which is the write end of a pipe created by `open_channel`. One
/// supervisor task per child waits for it to exit, or kills it once the
/// runtime is shut down.
pub struct ProcessRuntime {
    program: PathBuf,
    args: Vec<OsString>,
    supervisors: JoinSet<(WorkerId, io::Result<ExitStatus>)>,
    cancellation_token: CancellationToken,
}

impl ProcessRuntime {
    /// `program` is the row-worker executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            supervisors: JoinSet::new(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Extra arguments passed to every worker process
    pub fn with_worker_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Worker processes not yet reaped
    pub fn outstanding(&self) -> usize {
        self.supervisors.len()
    }

    fn supervise(&mut self, worker: WorkerId, mut child: Child) {
        let token = self.cancellation_token.clone();
        self.supervisors.spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                _ = token.cancelled() => {
                    if let Err(err) = child.start_kill() {
                        warn!(%worker, %err, "failed to kill worker process");
                    }
                    child.wait().await
                }
            };
            (worker, status)
        });
    }
}

impl WorkerRuntime for ProcessRuntime {
    type Writer = PipeWriter;
    type Reader = pipe::Receiver;

    fn open_channel(&mut self, payload_len: usize) -> io::Result<(PipeWriter, pipe::Receiver)> {
        if payload_len > PIPE_CAPACITY {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("a {payload_len} byte row exceeds the {PIPE_CAPACITY} byte pipe buffer"),
            ));
        }
        let (reader, writer) = io::pipe()?;
        let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
        Ok((writer, receiver))
    }

    async fn spawn(&mut self, task: RowTask, writer: PipeWriter) -> io::Result<WorkerId> {
        let input = serde_json::to_vec(&task)?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(writer)
            .kill_on_drop(true);
        let mut child = command.spawn()?;
        // the command holds the parent's copy of the write end
        drop(command);

        let worker = WorkerId::new(child.id().map(u64::from).unwrap_or_default());
        let stdin = child.stdin.take();
        self.supervise(worker, child);
        debug!(%worker, row = task.row(), "worker process started");

        let mut stdin = stdin.ok_or_else(|| io::Error::other("worker stdin was not captured"))?;
        stdin.write_all(&input).await?;
        stdin.shutdown().await?;
        Ok(worker)
    }

    async fn wait_next(&mut self) -> Option<Termination> {
        loop {
            match self.supervisors.join_next().await? {
                Ok((worker, status)) => return Some(termination_of(worker, status)),
                Err(err) => warn!(%err, "worker supervisor lost"),
            }
        }
    }

    async fn shutdown(&mut self) {
        debug!(outstanding = self.supervisors.len(), "killing worker processes");
        self.cancellation_token.cancel();
        while let Some(joined) = self.supervisors.join_next().await {
            if let Ok((worker, status)) = joined {
                debug!(%worker, ?status, "worker process reaped");
            }
        }
        self.cancellation_token = CancellationToken::new();
    }
}
