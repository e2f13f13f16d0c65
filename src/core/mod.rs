//! Core task lifecycle, scheduler contexts, and completion primitives.

pub mod error;
pub mod foreground;
pub mod job;
pub mod progress;
pub mod task;
pub mod worker_pool;

pub use error::{AppResult, TaskError};
pub use foreground::ForegroundContext;
pub use job::{CancelToken, JobHandle, JobOutcome, JobState};
pub use progress::ProgressPublisher;
pub use task::{AsyncTask, Phase, TaskContext, TaskRunner};
pub use worker_pool::BackgroundPool;
