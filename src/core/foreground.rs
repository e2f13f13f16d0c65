//! Serialized foreground context modeling an owner/UI thread.
//!
//! Work submitted here runs one unit at a time, in submission order, on a
//! single dedicated consumer thread. Lifecycle hooks and progress deliveries
//! are scheduled onto this context so they never overlap each other.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{unbounded, Sender};
use parking_lot::Mutex;
use tracing::{debug, error};

use super::error::TaskError;

type ForegroundJob = Box<dyn FnOnce() + Send + 'static>;

/// Strict-FIFO, single-consumer execution context.
///
/// Submissions never block. Jobs run to completion one at a time; a job that
/// panics is logged and the consumer keeps draining the queue, so a faulty
/// hook cannot take the owner thread down with it.
pub struct ForegroundContext {
    /// Job sender. `None` once the context has shut down.
    tx: Mutex<Option<Sender<ForegroundJob>>>,

    /// Consumer thread handle, joined on drop.
    consumer: Mutex<Option<JoinHandle<()>>>,

    /// Identity of the consumer thread, used for deadlock detection.
    consumer_thread: ThreadId,
}

impl ForegroundContext {
    /// Create a context and spawn its consumer thread.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<ForegroundJob>();

        let handle = thread::Builder::new()
            .name("raywatch-foreground".into())
            .spawn(move || {
                debug!("foreground consumer started");
                while let Ok(job) = rx.recv() {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("foreground job panicked; consumer continues");
                    }
                }
                debug!("foreground consumer exiting");
            })
            .expect("failed to spawn foreground consumer thread");

        let consumer_thread = handle.thread().id();

        Self {
            tx: Mutex::new(Some(tx)),
            consumer: Mutex::new(Some(handle)),
            consumer_thread,
        }
    }

    /// Submit a unit of work. Runs after every previously submitted unit has
    /// finished; never blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Shutdown` if the context has been shut down.
    pub fn submit<F>(&self, job: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = self.tx.lock();
        let Some(tx) = guard.as_ref() else {
            return Err(TaskError::Shutdown);
        };
        tx.send(Box::new(job)).map_err(|_| TaskError::Shutdown)
    }

    /// Whether the calling thread is the consumer thread of this context.
    ///
    /// Blocking joins check this to reject calls that would deadlock: the
    /// consumer cannot wait for work that only it can run.
    #[must_use]
    pub fn is_foreground_thread(&self) -> bool {
        thread::current().id() == self.consumer_thread
    }

    /// Close the queue and join the consumer after it drains pending work.
    ///
    /// Idempotent; called automatically on drop.
    pub fn shutdown(&self) {
        {
            let mut tx = self.tx.lock();
            *tx = None;
        }
        let handle = self.consumer.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("foreground consumer panicked during shutdown");
            }
        }
    }
}

impl Default for ForegroundContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ForegroundContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
