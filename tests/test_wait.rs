#![cfg(unix)]

mod common;

use std::time::Duration;

use process_supervisor::ExitOutcome;

use common::{spawn_shell, spawn_sleeper};

#[tokio::test]
async fn parallel_waiters_observe_the_same_outcome() {
    let (handle, _buffer) = spawn_shell("sleep 0.2; exit 3");

    let (h1, h2, h3) = (handle.clone(), handle.clone(), handle.clone());
    let (o1, o2, o3) = tokio::join!(h1.wait(), h2.wait(), h3.wait());

    assert_eq!(o1, ExitOutcome::Exited(3));
    assert_eq!(o1, o2);
    assert_eq!(o2, o3);
}

#[tokio::test]
async fn consecutive_waits_return_the_finalized_value() {
    let (handle, _buffer) = spawn_shell("exit 0");

    let first = handle.wait().await;
    let second = handle.wait().await;

    assert_eq!(first, ExitOutcome::Exited(0));
    assert_eq!(first, second);
    assert!(handle.is_finished());
}

#[tokio::test]
async fn exit_report_is_unset_until_completion() {
    let (handle, _buffer) = spawn_sleeper("30");
    assert!(handle.exit_report().is_none());
    assert!(!handle.is_finished());

    handle.stop(true).await.unwrap();
    let outcome = handle.wait().await;
    assert!(!outcome.success());

    let report = handle.exit_report().unwrap();
    assert_eq!(report.outcome, outcome);
    assert!(handle.runtime().is_some());
}

#[tokio::test]
async fn runtime_spans_spawn_to_finalize() {
    let (handle, _buffer) = spawn_shell("sleep 0.1");
    assert!(handle.wait().await.success());

    let runtime = handle.runtime().unwrap();
    assert!(runtime >= Duration::from_millis(50));
}
