use crate::process::handle::TerminationError;

/// Delivers SIGINT (graceful) or SIGKILL (forced) to the process.
///
/// The kernel rejecting the signal (ESRCH after the process already exited,
/// EPERM on an unowned pid) surfaces as a [`TerminationError`]; callers whose
/// goal is "make sure it is not running" can ignore it.
#[cfg(unix)]
pub(crate) fn deliver(pid: u32, force: bool) -> Result<(), TerminationError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let signal = if force { Signal::SIGKILL } else { Signal::SIGINT };
    kill(Pid::from_raw(pid as i32), signal)
        .map_err(|source| TerminationError::Signal { pid, source })
}

#[cfg(not(unix))]
pub(crate) fn deliver(pid: u32, force: bool) -> Result<(), TerminationError> {
    let _ = (pid, force);
    Err(TerminationError::Unsupported)
}
