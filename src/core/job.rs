//! Job handles, completion gating, and cancellation.
//!
//! A [`JobHandle`] is a future-like reference to a single unit of background
//! work. The [`CompletionGate`] is the blocking join primitive the runner
//! opens only after the whole lifecycle, post-hook included, has run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use uuid::Uuid;

/// Lifecycle states of a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created but not yet picked up by a worker.
    Pending,
    /// Background work is executing.
    Running,
    /// Background work finished successfully.
    Completed,
    /// Background work returned an error or panicked.
    Failed,
    /// Background work observed a tripped cancel token and stopped early.
    Cancelled,
}

/// Typed resolution of a background job, handed to `on_post_execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The work ran to completion.
    Completed,
    /// The work failed; carries the failure description.
    Failed(String),
    /// The work was cancelled cooperatively.
    Cancelled,
}

impl JobOutcome {
    /// The terminal [`JobState`] this outcome maps to.
    #[must_use]
    pub const fn state(&self) -> JobState {
        match self {
            Self::Completed => JobState::Completed,
            Self::Failed(_) => JobState::Failed,
            Self::Cancelled => JobState::Cancelled,
        }
    }
}

struct JobCore {
    state: JobState,
    outcome: Option<JobOutcome>,
}

struct JobInner {
    core: Mutex<JobCore>,
    resolved: Condvar,
}

/// Future-like handle to one unit of background work.
///
/// Clones observe the same job. The creating runner holds the job exclusively
/// until it resolves; observers may wait on or poll the state.
#[derive(Clone)]
pub struct JobHandle {
    id: Uuid,
    inner: Arc<JobInner>,
}

impl JobHandle {
    /// Create a handle in the `Pending` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: Arc::new(JobInner {
                core: Mutex::new(JobCore {
                    state: JobState::Pending,
                    outcome: None,
                }),
                resolved: Condvar::new(),
            }),
        }
    }

    /// Identifier for log correlation.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> JobState {
        self.inner.core.lock().state
    }

    /// Whether the job has reached a terminal state.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.state(),
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }

    /// The outcome, if resolved.
    #[must_use]
    pub fn outcome(&self) -> Option<JobOutcome> {
        self.inner.core.lock().outcome.clone()
    }

    /// Mark the job as picked up by a worker.
    pub(crate) fn mark_running(&self) {
        let mut core = self.inner.core.lock();
        if core.state == JobState::Pending {
            core.state = JobState::Running;
        }
    }

    /// Resolve the job with a terminal outcome and wake all waiters.
    pub(crate) fn resolve(&self, outcome: JobOutcome) {
        let mut core = self.inner.core.lock();
        core.state = outcome.state();
        core.outcome = Some(outcome);
        self.inner.resolved.notify_all();
    }

    /// Block the calling thread until the job resolves.
    pub fn wait(&self) -> JobOutcome {
        let mut core = self.inner.core.lock();
        while core.outcome.is_none() {
            self.inner.resolved.wait(&mut core);
        }
        core.outcome.clone().unwrap_or(JobOutcome::Completed)
    }
}

impl Default for JobHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking join primitive for one task lifecycle.
///
/// Reset when a lifecycle starts, opened after `on_post_execute` returns.
/// Waiting on an open gate returns immediately, making joins idempotent.
pub(crate) struct CompletionGate {
    done: Mutex<bool>,
    opened: Condvar,
}

impl CompletionGate {
    pub(crate) fn new() -> Self {
        Self {
            // Open until a lifecycle starts, so a join on a never-started
            // runner does not hang.
            done: Mutex::new(true),
            opened: Condvar::new(),
        }
    }

    /// Close the gate for a new lifecycle.
    pub(crate) fn reset(&self) {
        *self.done.lock() = false;
    }

    /// Open the gate and wake all waiters.
    pub(crate) fn open(&self) {
        let mut done = self.done.lock();
        *done = true;
        self.opened.notify_all();
    }

    /// Block until the gate is open.
    pub(crate) fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.opened.wait(&mut done);
        }
    }
}

/// Cooperative cancellation signal.
///
/// Clones share the flag. Background work observes the token between units
/// of progress; the periodic monitor checks it every tick, alongside the
/// engine state.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an untripped token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Irreversible for this token's lifetime.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the token has been tripped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn job_resolution_wakes_waiters() {
        let job = JobHandle::new();
        assert_eq!(job.state(), JobState::Pending);

        let waiter = job.clone();
        let handle = thread::spawn(move || waiter.wait());

        thread::sleep(Duration::from_millis(20));
        job.mark_running();
        assert_eq!(job.state(), JobState::Running);
        job.resolve(JobOutcome::Completed);

        assert_eq!(handle.join().unwrap(), JobOutcome::Completed);
        assert!(job.is_resolved());
    }

    #[test]
    fn failed_outcome_maps_to_failed_state() {
        let job = JobHandle::new();
        job.resolve(JobOutcome::Failed("engine fault".into()));
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(job.outcome(), Some(JobOutcome::Failed("engine fault".into())));
    }

    #[test]
    fn gate_is_idempotent() {
        let gate = CompletionGate::new();
        gate.wait(); // open before any lifecycle

        gate.reset();
        gate.open();
        gate.wait();
        gate.wait(); // second join returns immediately
    }

    #[test]
    fn cancel_token_shares_state_across_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
