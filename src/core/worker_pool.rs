//! Background context: a bounded pool of dedicated OS worker threads.
//!
//! Each worker owns a single-threaded tokio runtime, so submitted work can be
//! async (timers, channels) while still running on a dedicated thread that
//! never blocks the owner thread or any other runtime. Workers block on
//! channel recv; dropping the sender unblocks them naturally.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::PoolConfig;

use super::error::TaskError;

/// A unit of background work. Receives the worker's runtime so it can drive
/// async code to completion on the worker thread.
pub type PoolJob = Box<dyn FnOnce(&tokio::runtime::Runtime) + Send + 'static>;

/// Sender plus worker handles for one pool generation. Replaced wholesale by
/// [`BackgroundPool::drain_and_restart`].
struct PoolGeneration {
    tx: Option<Sender<PoolJob>>,
    workers: Vec<JoinHandle<()>>,
}

/// Bounded worker pool for compute-bound or blocking work.
///
/// Ordering across workers is unspecified; each unit of work runs to
/// completion on one worker without interleaving with itself.
pub struct BackgroundPool {
    config: PoolConfig,
    generation: Mutex<PoolGeneration>,
}

impl BackgroundPool {
    /// Create a pool and spawn its worker threads.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: PoolConfig) -> Result<Self, TaskError> {
        config.validate().map_err(TaskError::InvalidConfig)?;

        let generation = Mutex::new(Self::spawn_generation(&config));

        info!(
            worker_count = config.worker_count,
            max_queue_depth = config.max_queue_depth,
            "background pool initialized"
        );

        Ok(Self { config, generation })
    }

    /// Submit a unit of work. The enqueue itself never blocks.
    ///
    /// # Errors
    ///
    /// - `TaskError::QueueFull` if the job queue is at capacity
    /// - `TaskError::Shutdown` if the pool has been shut down
    pub fn submit<F>(&self, job: F) -> Result<(), TaskError>
    where
        F: FnOnce(&tokio::runtime::Runtime) + Send + 'static,
    {
        let generation = self.generation.lock();
        let Some(tx) = generation.tx.as_ref() else {
            return Err(TaskError::Shutdown);
        };
        match tx.try_send(Box::new(job)) {
            Ok(()) => Ok(()),
            Err(crossbeam_channel::TrySendError::Full(_)) => Err(TaskError::QueueFull),
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => Err(TaskError::Shutdown),
        }
    }

    /// Shut down the current workers, wait for them to drain queued work, and
    /// respawn an equivalent fresh generation so the pool stays usable.
    ///
    /// Blocks the caller until every old worker has exited.
    pub fn drain_and_restart(&self) {
        let mut generation = self.generation.lock();

        generation.tx = None;
        for worker in generation.workers.drain(..) {
            if worker.join().is_err() {
                error!("background worker panicked during drain");
            }
        }
        debug!("background pool drained");

        *generation = Self::spawn_generation(&self.config);
        debug!(worker_count = self.config.worker_count, "background pool restarted");
    }

    /// Shut down without respawning. Queued work still drains first.
    pub fn shutdown(&self) {
        let mut generation = self.generation.lock();
        generation.tx = None;
        for worker in generation.workers.drain(..) {
            if worker.join().is_err() {
                error!("background worker panicked during shutdown");
            }
        }
        info!("background pool shut down");
    }

    fn spawn_generation(config: &PoolConfig) -> PoolGeneration {
        let (tx, rx) = bounded::<PoolJob>(config.max_queue_depth);

        let mut workers = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            workers.push(spawn_worker(worker_id, rx.clone(), config.thread_stack_size));
        }

        PoolGeneration {
            tx: Some(tx),
            workers,
        }
    }
}

impl Drop for BackgroundPool {
    fn drop(&mut self) {
        // Close the queue but do not join: a pool dropped mid-task must not
        // hang the dropping thread. Explicit shutdown() joins.
        let mut generation = self.generation.lock();
        generation.tx = None;
        if !generation.workers.is_empty() {
            debug!("background pool dropped without shutdown; workers detached");
        }
    }
}

/// Spawn one worker thread with its own single-threaded tokio runtime.
fn spawn_worker(worker_id: usize, rx: Receiver<PoolJob>, stack_size: usize) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("raywatch-worker-{worker_id}"))
        .stack_size(stack_size)
        .spawn(move || {
            debug!(worker_id, "worker thread started");

            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!(worker_id, error = %e, "failed to create worker runtime");
                    return;
                }
            };

            // Blocking recv; exits when the sender is dropped.
            while let Ok(job) = rx.recv() {
                job(&rt);
            }

            debug!(worker_id, "worker thread exiting");
        })
        .expect("failed to spawn background worker thread")
}
