//! Unit tests for the error taxonomy.

use raywatch::core::TaskError;

#[test]
fn display_messages() {
    assert_eq!(TaskError::AlreadyRunning.to_string(), "task already running");
    assert_eq!(
        TaskError::DeadlockRisk.to_string(),
        "wait_to_finish called from the foreground context"
    );
    assert_eq!(TaskError::QueueFull.to_string(), "background queue full");
    assert_eq!(TaskError::Shutdown.to_string(), "scheduler context shut down");
}

#[test]
fn background_failure_carries_reason() {
    let err = TaskError::BackgroundFailure("tick body panicked".into());
    assert!(err.to_string().contains("tick body panicked"));
}

#[test]
fn errors_convert_into_anyhow() {
    let err: anyhow::Error = TaskError::AlreadyRunning.into();
    assert_eq!(err.to_string(), "task already running");
}
