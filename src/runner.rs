use std::path::PathBuf;

use crate::{OutputBuffer, ProcessBuilder, SpawnError};

/// What [`run`] produced: the process's combined output and whether it
/// exited cleanly.
///
/// A failed command looks identical in shape to a successful one. Callers
/// must inspect `succeeded`; a non-zero or signalled exit is a result, not
/// an error.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Everything the process wrote to stdout and stderr, decoded lossily.
    pub output: String,
    /// True only for a plain zero exit.
    pub succeeded: bool,
}

/// Runs a command to completion and collects its output.
///
/// Spawns with no input and a fresh in-memory buffer as the output sink,
/// then blocks on the completion signal. The only error is a spawn failure;
/// wait or finalize problems degrade to `succeeded = false`.
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = process_supervisor::run(".", "echo", ["hello"]).await?;
/// assert!(result.succeeded);
/// assert_eq!(result.output, "hello\n");
/// # Ok(())
/// # }
/// ```
pub async fn run<I, S>(
    dir: impl Into<PathBuf>,
    command: impl Into<String>,
    args: I,
) -> Result<RunResult, SpawnError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new(command)
        .with_args(args)
        .with_current_dir(dir)
        .with_output(buffer.clone())
        .spawn()?;

    let outcome = handle.wait().await;
    Ok(RunResult {
        output: buffer.to_string_lossy(),
        succeeded: outcome.success(),
    })
}
