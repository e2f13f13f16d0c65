//! Error types for task lifecycle operations.

use thiserror::Error;

/// Errors produced by the task executor and scheduler contexts.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A `start()` call while a prior job on the same runner is unresolved.
    /// The call is rejected, never queued.
    #[error("task already running")]
    AlreadyRunning,
    /// A blocking join was requested from the foreground consumer thread,
    /// which must stay free to run the hooks the join waits on.
    #[error("wait_to_finish called from the foreground context")]
    DeadlockRisk,
    /// Background work returned an error or panicked.
    #[error("background work failed: {0}")]
    BackgroundFailure(String),
    /// The background pool's job queue is full.
    #[error("background queue full")]
    QueueFull,
    /// The target scheduler context has been shut down.
    #[error("scheduler context shut down")]
    Shutdown,
    /// Configuration or builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
