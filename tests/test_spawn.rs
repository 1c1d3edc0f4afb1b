#![cfg(unix)]

mod common;

use std::time::SystemTime;

use process_supervisor::{OutputBuffer, ProcessBuilder, SpawnError};

use common::spawn_shell;

#[tokio::test]
async fn spawn_assigns_pid_and_start_time() {
    let (handle, _buffer) = spawn_shell("exit 0");
    assert!(handle.pid() > 0);
    assert!(handle.started_at() <= SystemTime::now());
    assert_eq!(handle.label(), "sh");
    assert_eq!(handle.exec_path(), "sh");
    handle.wait().await;
}

#[tokio::test]
async fn spawn_honors_label_and_args() {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("echo")
        .with_label("greeter")
        .with_args(["a", "b"])
        .with_output(buffer.clone())
        .spawn()
        .unwrap();

    assert_eq!(handle.label(), "greeter");
    assert_eq!(handle.args(), ["a", "b"]);
    assert!(handle.wait().await.success());
    assert_eq!(buffer.to_string_lossy(), "a b\n");
}

#[tokio::test]
async fn spawn_missing_executable_is_an_error() {
    let result = ProcessBuilder::new("does-not-exist-xyz").spawn();
    assert!(matches!(result, Err(SpawnError::Io { .. })));
}

#[tokio::test]
async fn spawn_invalid_working_directory_is_an_error() {
    let result = ProcessBuilder::new("echo")
        .with_current_dir("/definitely/not/a/dir")
        .spawn();
    assert!(matches!(result, Err(SpawnError::Io { .. })));
}

#[tokio::test]
async fn spawn_honors_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();

    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("pwd")
        .with_current_dir(dir.path())
        .with_output(buffer.clone())
        .spawn()
        .unwrap();

    assert!(handle.wait().await.success());
    assert_eq!(
        buffer.to_string_lossy().trim_end(),
        canonical.to_string_lossy()
    );
}

#[tokio::test]
async fn spawn_passes_environment_variables() {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("sh")
        .with_args(["-c", "printf '%s' \"$MARKER\""])
        .with_env("MARKER", "present")
        .with_output(buffer.clone())
        .spawn()
        .unwrap();

    assert!(handle.wait().await.success());
    assert_eq!(buffer.to_string_lossy(), "present");
}

#[tokio::test]
async fn spawn_feeds_input_stream_to_stdin() {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("cat")
        .with_input(&b"piped through\n"[..])
        .with_output(buffer.clone())
        .spawn()
        .unwrap();

    assert!(handle.wait().await.success());
    assert_eq!(buffer.to_string_lossy(), "piped through\n");
}

#[tokio::test]
async fn spawn_without_output_sink_still_finalizes() {
    let handle = ProcessBuilder::new("echo")
        .with_arg("discarded")
        .spawn()
        .unwrap();
    assert!(handle.wait().await.success());
    assert!(handle.exit_report().is_some());
}

#[tokio::test]
async fn output_can_go_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");
    let file = tokio::fs::File::create(&path).await.unwrap();

    let handle = ProcessBuilder::new("echo")
        .with_arg("to file")
        .with_output(file)
        .spawn()
        .unwrap();

    assert!(handle.wait().await.success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "to file\n");
}
