use matrix_mul_core::{Termination, TerminationCause, WorkerId};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Maps the way a worker process ended onto a termination event
pub fn termination_of(worker: WorkerId, status: io::Result<ExitStatus>) -> Termination {
    let cause = match status {
        Ok(status) if status.success() => return Termination::Completed(worker),
        Ok(status) => match (status.code(), status.signal()) {
            (Some(code), _) => TerminationCause::Exited(code),
            (None, Some(signal)) => TerminationCause::Signaled(signal),
            (None, None) => TerminationCause::Wait(format!("unrecognised exit status {status}")),
        },
        Err(err) => TerminationCause::Wait(err.to_string()),
    };
    Termination::Abnormal { worker, cause }
}
