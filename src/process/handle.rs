use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
    time::{Duration, SystemTime},
};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    output::{close_sink, SinkSlot},
    process::{ExitOutcome, ExitReport},
    signal, ProcessLabel,
};

/// Signal delivery was rejected by the OS, e.g. the process already exited
/// or is not owned by the caller.
///
/// Recoverable: when the caller's goal is "make sure it is not running", a
/// prior natural exit satisfies that goal and this error can be ignored.
#[derive(Debug, Error)]
pub enum TerminationError {
    #[cfg(unix)]
    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },
    #[error("process signalling is not supported on this platform")]
    Unsupported,
}

pub(crate) struct ProcessInner {
    pub(crate) label: ProcessLabel,
    pub(crate) exec_path: String,
    pub(crate) args: Vec<String>,
    pub(crate) current_dir: Option<PathBuf>,
    pub(crate) pid: u32,
    pub(crate) started_at: SystemTime,
    pub(crate) exit: OnceLock<ExitReport>,
    pub(crate) done: CancellationToken,
    pub(crate) output: SinkSlot,
}

/// The caller-visible record of one spawned process.
///
/// Cheap to clone; all clones observe the same process. The handle never
/// blocks except in [`wait`](Self::wait), and dropping it leaves the process
/// and its watcher running.
#[derive(Clone)]
pub struct ProcessHandle {
    pub(crate) inner: Arc<ProcessInner>,
}

impl ProcessHandle {
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn exec_path(&self) -> &str {
        &self.inner.exec_path
    }

    pub fn args(&self) -> &[String] {
        &self.inner.args
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.inner.current_dir.as_deref()
    }

    pub fn pid(&self) -> u32 {
        self.inner.pid
    }

    pub fn started_at(&self) -> SystemTime {
        self.inner.started_at
    }

    /// Final exit record, or `None` while the process is still running.
    ///
    /// Written exactly once by the watcher before the completion signal
    /// fires; after [`wait`](Self::wait) returns this is always `Some` and
    /// never changes again.
    pub fn exit_report(&self) -> Option<&ExitReport> {
        self.inner.exit.get()
    }

    pub fn exit_outcome(&self) -> Option<ExitOutcome> {
        self.exit_report().map(|report| report.outcome.clone())
    }

    pub fn ended_at(&self) -> Option<SystemTime> {
        self.exit_report().map(|report| report.ended_at)
    }

    /// Wall-clock time between spawn and finalization, once finished.
    pub fn runtime(&self) -> Option<Duration> {
        self.ended_at()
            .map(|ended_at| ended_at.duration_since(self.started_at()).unwrap_or_default())
    }

    /// Whether the completion signal has fired.
    pub fn is_finished(&self) -> bool {
        self.inner.done.is_cancelled()
    }

    /// Blocks until the watcher has finalized the process, then returns the
    /// recorded outcome.
    ///
    /// Any number of callers may wait concurrently; all observe the same
    /// outcome. There is no built-in timeout: race this future against a
    /// timer and call [`stop`](Self::stop) to impose a deadline.
    pub async fn wait(&self) -> ExitOutcome {
        self.inner.done.cancelled().await;
        match self.inner.exit.get() {
            Some(report) => report.outcome.clone(),
            // The watcher records the report before firing the signal.
            None => ExitOutcome::Unknown("completion fired without an exit report".into()),
        }
    }

    /// Requests termination without waiting for exit.
    ///
    /// `force` sends an unconditional kill; otherwise an interrupt is sent
    /// and the child may shut down on its own terms. Escalation from
    /// interrupt to kill is the caller's decision. The output sink is also
    /// closed here as a defensive cleanup; the watcher's own close tolerates
    /// it.
    ///
    /// Exit is observed asynchronously by the watcher, never here: a caller
    /// that needs the process gone still awaits [`wait`](Self::wait).
    pub async fn stop(&self, force: bool) -> Result<(), TerminationError> {
        debug!(pid = self.inner.pid, label = %self.inner.label, force, "stopping process");
        let delivered = signal::deliver(self.inner.pid, force);
        if let Err(err) = close_sink(&self.inner.output).await {
            debug!(pid = self.inner.pid, error = %err, "output sink close during stop failed");
        }
        delivered
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("label", &self.inner.label)
            .field("exec_path", &self.inner.exec_path)
            .field("pid", &self.inner.pid)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}
