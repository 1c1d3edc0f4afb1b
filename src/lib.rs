//! # process-supervisor
//!
//! `process-supervisor` spawns external OS processes on Tokio, captures
//! their output, tracks running/exited state asynchronously, and exposes
//! controlled termination (graceful interrupt or unconditional kill).
//!
//! ## Install
//!
//! ```bash
//! cargo add process-supervisor
//! ```
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use process_supervisor::run;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = run(".", "echo", ["hello"]).await?;
//!     assert!(result.succeeded);
//!     print!("{}", result.output);
//!     Ok(())
//! }
//! ```
//!
//! ## What you get
//!
//! * **Non-blocking spawn** – [`ProcessBuilder::spawn`] returns a
//!   [`ProcessHandle`] immediately; a background watcher task per process
//!   observes exit and finalizes the handle.
//! * **Output capture** – stdout and stderr are pumped into any
//!   `AsyncWrite` sink (file, pipe, or the bundled [`OutputBuffer`]), which
//!   is closed exactly once after the process exits.
//! * **Decoupled termination** – [`ProcessHandle::stop`] sends an interrupt
//!   or a kill without waiting; exit is observed through
//!   [`ProcessHandle::wait`], a one-shot signal safe for any number of
//!   concurrent waiters.
//! * **Run to completion** – [`run`] for the common "run and collect
//!   output" case; an abnormal exit is a result, not an error.
//!
//! ## API overview
//!
//! | Method                          | Purpose                                          |
//! | ------------------------------- | ------------------------------------------------ |
//! | `ProcessBuilder::new(path)`     | Configure a process (args, dir, env, streams)    |
//! | `.spawn()`                      | Start process + watcher, get a `ProcessHandle`   |
//! | `handle.wait().await`           | Block until finalized, read the [`ExitOutcome`]  |
//! | `handle.stop(force).await`      | Interrupt (`false`) or kill (`true`), no waiting |
//! | `handle.exit_report()`          | Finalized end time and outcome, write-once       |
//! | `run(dir, cmd, args).await`     | Spawn, wait, and collect output in one call      |
//!
//! ## License
//!
//! [MIT](./LICENSE)

pub use output::{OutputBuffer, StreamCloseError};
pub use process::{
    builder::{ProcessBuilder, SpawnError},
    handle::{ProcessHandle, TerminationError},
    ExitOutcome, ExitReport,
};
pub use runner::{run, RunResult};

mod output;
mod process;
mod runner;
mod signal;

pub type ProcessLabel = String;
