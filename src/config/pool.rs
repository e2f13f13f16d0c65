//! Background pool configuration.

use serde::{Deserialize, Serialize};

/// Default cap on worker threads; render monitors need at most a couple.
const DEFAULT_WORKER_CAP: usize = 4;

/// Default stack size per worker thread (2 MiB).
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Default bound on queued jobs per pool.
const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Configuration for a [`BackgroundPool`](crate::core::BackgroundPool).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Maximum queued jobs before submissions are rejected.
    pub max_queue_depth: usize,
    /// Stack size per worker thread, in bytes.
    pub thread_stack_size: usize,
}

impl PoolConfig {
    /// Create a configuration sized to the host: `min(cpus, 4)` workers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            worker_count: num_cpus::get().min(DEFAULT_WORKER_CAP).max(1),
            max_queue_depth: DEFAULT_QUEUE_DEPTH,
            thread_stack_size: DEFAULT_STACK_SIZE,
        }
    }

    /// Set the worker count.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the queue depth bound.
    #[must_use]
    pub const fn with_max_queue_depth(mut self, max_queue_depth: usize) -> Self {
        self.max_queue_depth = max_queue_depth;
        self
    }

    /// Set the per-worker stack size in bytes.
    #[must_use]
    pub const fn with_thread_stack_size(mut self, thread_stack_size: usize) -> Self {
        self.thread_stack_size = thread_stack_size;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.max_queue_depth == 0 {
            return Err("max_queue_depth must be greater than 0".into());
        }
        if self.thread_stack_size < 64 * 1024 {
            return Err("thread_stack_size must be at least 64 KiB".into());
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}
