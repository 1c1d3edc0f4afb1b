pub(crate) mod builder;
pub(crate) mod handle;

use std::{process::ExitStatus, sync::Arc, time::SystemTime};

use tokio::{process::Child, task::JoinHandle};
use tracing::{debug, warn};

use crate::{output::close_sink, process::handle::ProcessInner};

/// How a process reached its terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The process exited on its own with a status code.
    Exited(i32),
    /// The process was terminated by a signal (including a forced kill).
    Signaled(i32),
    /// The OS wait call failed, e.g. the process was already reaped by
    /// another party. The reason is kept for diagnostics.
    Unknown(String),
}

impl ExitOutcome {
    /// Only a plain zero exit counts as success.
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    pub(crate) fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Self::Exited(code),
            #[cfg(unix)]
            None => {
                use std::os::unix::process::ExitStatusExt;
                match status.signal() {
                    Some(signal) => Self::Signaled(signal),
                    None => Self::Unknown(format!("process ended without code or signal: {status}")),
                }
            }
            #[cfg(not(unix))]
            None => Self::Unknown(format!("process ended without an exit code: {status}")),
        }
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {code}"),
            Self::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            Self::Unknown(reason) => write!(f, "unknown exit ({reason})"),
        }
    }
}

/// Final record written once by the watcher when the process is gone.
#[derive(Debug, Clone)]
pub struct ExitReport {
    pub ended_at: SystemTime,
    pub outcome: ExitOutcome,
}

/// One watcher task per spawned process: waits for the OS to report exit,
/// joins the output pumps, closes the sink, records the report, then fires
/// the completion token.
///
/// The report write and sink close happen before the token fires, so any
/// waiter released by the token sees the fully finalized handle. The watcher
/// never kills the process and never propagates an error; wait failures are
/// recorded as [`ExitOutcome::Unknown`].
pub(crate) fn watch(
    inner: Arc<ProcessInner>,
    mut child: Child,
    pumps: Vec<JoinHandle<()>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match child.wait().await {
            Ok(status) => ExitOutcome::from_status(status),
            Err(err) => {
                warn!(pid = inner.pid, label = %inner.label, error = %err, "wait on process failed");
                ExitOutcome::Unknown(err.to_string())
            }
        };

        // Pumps end at pipe EOF; joining them guarantees every byte the
        // child wrote is in the sink before it is closed.
        for pump in pumps {
            if let Err(err) = pump.await {
                debug!(pid = inner.pid, error = %err, "output pump ended abnormally");
            }
        }

        if let Err(err) = close_sink(&inner.output).await {
            warn!(pid = inner.pid, label = %inner.label, error = %err, "failed to close output sink");
        }

        let report = ExitReport {
            ended_at: SystemTime::now(),
            outcome,
        };
        debug!(pid = inner.pid, label = %inner.label, outcome = %report.outcome, "process finalized");
        let _ = inner.exit.set(report);
        inner.done.cancel();
    })
}
