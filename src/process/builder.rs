use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::{Arc, OnceLock},
    time::SystemTime,
};

use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    process::Command,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::{
    output::{pump_into, sink_slot, OutputSink},
    process::{handle::ProcessInner, watch},
    ProcessHandle, ProcessLabel,
};

/// The OS refused to create the process. The only error this crate raises
/// synchronously; when it occurs no handle exists and no watcher was started.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn `{exec_path}`: {source}")]
    Io {
        exec_path: String,
        #[source]
        source: std::io::Error,
    },
    /// The child spawned but the OS reported no pid for it.
    #[error("spawned `{exec_path}` but no pid was assigned")]
    MissingPid { exec_path: String },
}

type InputSource = Box<dyn AsyncRead + Send + Unpin>;

/// Configures and spawns one external process.
///
/// Standard output and standard error are both captured into the sink given
/// to [`with_output`](Self::with_output); without one the child's output is
/// discarded. Standard input is fed from [`with_input`](Self::with_input) or
/// closed immediately.
///
/// # Example
///
/// ```rust,no_run
/// use process_supervisor::{OutputBuffer, ProcessBuilder};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = OutputBuffer::new();
/// let handle = ProcessBuilder::new("echo")
///     .with_args(["hello"])
///     .with_output(buffer.clone())
///     .spawn()?;
///
/// let outcome = handle.wait().await;
/// assert!(outcome.success());
/// print!("{}", buffer.to_string_lossy());
/// # Ok(())
/// # }
/// ```
pub struct ProcessBuilder {
    label: Option<ProcessLabel>,
    exec_path: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
    input: Option<InputSource>,
    output: Option<OutputSink>,
}

impl ProcessBuilder {
    pub fn new(exec_path: impl Into<String>) -> Self {
        Self {
            label: None,
            exec_path: exec_path.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
            input: None,
            output: None,
        }
    }

    /// Human-readable label used in diagnostics. Defaults to the executable's
    /// file name.
    pub fn with_label(mut self, label: impl Into<ProcessLabel>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Source fed into the child's standard input. The pipe is closed when
    /// the source reaches EOF.
    pub fn with_input(mut self, input: impl AsyncRead + Send + Unpin + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Sink receiving the child's combined standard output and standard
    /// error. Closed exactly once by the watcher after the process exits.
    pub fn with_output(mut self, output: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Starts the process and its completion watcher, returning immediately.
    ///
    /// By the time this returns the handle carries the pid and start time,
    /// and the watcher task is running. The returned handle does not kill
    /// the process on drop.
    pub fn spawn(self) -> Result<ProcessHandle, SpawnError> {
        let capture_output = self.output.is_some();

        let mut command = Command::new(&self.exec_path);
        command
            .args(&self.args)
            .stdin(if self.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if capture_output {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(if capture_output {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command.envs(self.envs.iter().map(|(key, value)| (key, value)));

        let mut child = command.spawn().map_err(|source| {
            error!(exec_path = %self.exec_path, error = %source, "failed to spawn process");
            SpawnError::Io {
                exec_path: self.exec_path.clone(),
                source,
            }
        })?;
        let pid = child.id().ok_or_else(|| SpawnError::MissingPid {
            exec_path: self.exec_path.clone(),
        })?;

        if let (Some(mut source), Some(mut stdin)) = (self.input, child.stdin.take()) {
            tokio::spawn(async move {
                if let Err(err) = tokio::io::copy(&mut source, &mut stdin).await {
                    debug!(pid, error = %err, "stdin feed ended early");
                }
                // stdin drops here, closing the child's input pipe
            });
        }

        let output = sink_slot(self.output);
        let mut pumps = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            pumps.push(tokio::spawn(pump_into(stdout, output.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(tokio::spawn(pump_into(stderr, output.clone())));
        }

        let label = self.label.unwrap_or_else(|| {
            Path::new(&self.exec_path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.exec_path.clone())
        });
        let inner = Arc::new(ProcessInner {
            label,
            exec_path: self.exec_path,
            args: self.args,
            current_dir: self.current_dir,
            pid,
            started_at: SystemTime::now(),
            exit: OnceLock::new(),
            done: CancellationToken::new(),
            output,
        });

        watch(inner.clone(), child, pumps);
        debug!(pid, label = %inner.label, "spawned process");
        Ok(ProcessHandle { inner })
    }
}
