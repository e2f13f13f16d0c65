//! The four-phase asynchronous task contract and its runner.
//!
//! A task supplies four hooks: `on_pre_execute` (foreground, once),
//! `background_work` (background pool, once, may publish progress),
//! `on_progress_update` (foreground, once per delivered publication), and
//! `on_post_execute` (foreground, once, after resolution). The
//! [`TaskRunner`] owns the scheduling: exactly one [`JobHandle`] per
//! `start()`, a strict pre → background → post order, and a blocking
//! `wait_to_finish` that only returns once the post-hook has run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::PoolConfig;

use super::error::TaskError;
use super::foreground::ForegroundContext;
use super::job::{CancelToken, CompletionGate, JobHandle, JobOutcome};
use super::progress::ProgressPublisher;
use super::worker_pool::BackgroundPool;

/// Lifecycle phase of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never started, or reset after a drain.
    Idle,
    /// `on_pre_execute` is scheduled or running.
    PreExecute,
    /// `background_work` is scheduled or running.
    Background,
    /// Background work resolved; `on_post_execute` is scheduled or running.
    PostExecute,
    /// The lifecycle finished; the runner may be started again.
    Completed,
}

/// Handles background work receives for publishing progress and observing
/// cancellation.
pub struct TaskContext {
    /// Publishes progress deliveries onto the foreground context.
    pub progress: ProgressPublisher,
    /// Cooperative cancellation signal for this lifecycle.
    pub cancel: CancelToken,
}

/// The four extension points of an asynchronous task.
///
/// `background_work` returns a typed `Result`; a failure resolves the job as
/// `Failed` but never skips `on_post_execute` — diagnostics must always reach
/// the display, so the post-hook receives the outcome instead of the
/// lifecycle aborting.
#[async_trait]
pub trait AsyncTask: Send + Sync + 'static {
    /// Runs once on the foreground context before background work starts.
    fn on_pre_execute(&self) {}

    /// Runs once on the background pool. May call `ctx.progress.publish()`
    /// any number of times. Should observe `ctx.cancel` between units of
    /// work.
    async fn background_work(&self, ctx: &TaskContext) -> Result<(), TaskError>;

    /// Runs on the foreground context once per delivered progress
    /// publication. Must tolerate running while `background_work` is still
    /// in flight.
    fn on_progress_update(&self) {}

    /// Runs once on the foreground context after background work resolves,
    /// whatever the outcome.
    fn on_post_execute(&self, _outcome: &JobOutcome) {}
}

/// State shared between the runner and its in-flight closures.
struct RunnerShared {
    phase: Mutex<Phase>,
    job: Mutex<Option<JobHandle>>,
    cancel: Mutex<CancelToken>,
    gate: CompletionGate,
}

/// Drives one [`AsyncTask`] through its lifecycle.
///
/// Owns a dedicated [`BackgroundPool`]; shares the application's
/// [`ForegroundContext`]. At most one job is live per runner; a second
/// `start()` while a job is unresolved fails with
/// [`TaskError::AlreadyRunning`].
pub struct TaskRunner<T: AsyncTask> {
    task: Arc<T>,
    foreground: Arc<ForegroundContext>,
    pool: Arc<BackgroundPool>,
    publisher: ProgressPublisher,
    shared: Arc<RunnerShared>,
}

impl<T: AsyncTask> TaskRunner<T> {
    /// Create a runner for `task`, spawning its background pool.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidConfig` if the pool configuration is
    /// invalid.
    pub fn new(
        task: Arc<T>,
        foreground: Arc<ForegroundContext>,
        config: PoolConfig,
    ) -> Result<Self, TaskError> {
        let pool = Arc::new(BackgroundPool::new(config)?);

        let hook_task = Arc::clone(&task);
        let publisher = ProgressPublisher::new(
            Arc::clone(&foreground),
            Arc::new(move || hook_task.on_progress_update()),
        );

        Ok(Self {
            task,
            foreground,
            pool,
            publisher,
            shared: Arc::new(RunnerShared {
                phase: Mutex::new(Phase::Idle),
                job: Mutex::new(None),
                cancel: Mutex::new(CancelToken::new()),
                gate: CompletionGate::new(),
            }),
        })
    }

    /// Start the lifecycle: schedule `on_pre_execute` on the foreground,
    /// then `background_work` on the pool, then `on_post_execute` on the
    /// foreground. Never blocks.
    ///
    /// Returns an observer handle to the job created by this call.
    ///
    /// # Errors
    ///
    /// - `TaskError::AlreadyRunning` if a prior job is unresolved
    /// - `TaskError::Shutdown` if the foreground context has shut down
    pub fn start(&self) -> Result<JobHandle, TaskError> {
        {
            let mut phase = self.shared.phase.lock();
            match *phase {
                Phase::Idle | Phase::Completed => *phase = Phase::PreExecute,
                _ => return Err(TaskError::AlreadyRunning),
            }
            // Close the gate before the new phase becomes observable, so a
            // concurrent join cannot slip through on the previous run's open
            // gate.
            self.shared.gate.reset();
        }

        let cancel = CancelToken::new();
        *self.shared.cancel.lock() = cancel.clone();

        let job = JobHandle::new();
        *self.shared.job.lock() = Some(job.clone());

        info!(job_id = %job.id(), "task lifecycle starting");

        let task = Arc::clone(&self.task);
        let foreground = Arc::clone(&self.foreground);
        let pool = Arc::clone(&self.pool);
        let shared = Arc::clone(&self.shared);
        let publisher = self.publisher.clone();
        let fg_job = job.clone();

        let scheduled = self.foreground.submit(move || {
            debug!(job_id = %fg_job.id(), "on_pre_execute");
            task.on_pre_execute();
            *shared.phase.lock() = Phase::Background;

            let ctx = TaskContext {
                progress: publisher,
                cancel,
            };
            let bg_task = Arc::clone(&task);
            let bg_job = fg_job.clone();
            let bg_shared = Arc::clone(&shared);
            let bg_foreground = Arc::clone(&foreground);

            let submitted = pool.submit(move |rt| {
                bg_job.mark_running();
                debug!(job_id = %bg_job.id(), "background_work");

                let result = catch_unwind(AssertUnwindSafe(|| {
                    rt.block_on(bg_task.background_work(&ctx))
                }));

                let outcome = match result {
                    Ok(Ok(())) if ctx.cancel.is_cancelled() => JobOutcome::Cancelled,
                    Ok(Ok(())) => JobOutcome::Completed,
                    Ok(Err(e)) => JobOutcome::Failed(e.to_string()),
                    Err(_) => JobOutcome::Failed("background work panicked".into()),
                };

                finish_lifecycle(&bg_foreground, &bg_shared, &bg_task, &bg_job, outcome);
            });

            if let Err(e) = submitted {
                error!(error = %e, "failed to schedule background work");
                finish_lifecycle(
                    &foreground,
                    &shared,
                    &task,
                    &fg_job,
                    JobOutcome::Failed(e.to_string()),
                );
            }
        });

        if let Err(e) = scheduled {
            *self.shared.phase.lock() = Phase::Idle;
            *self.shared.job.lock() = None;
            self.shared.gate.open();
            return Err(e);
        }

        Ok(job)
    }

    /// Block until the current lifecycle has fully finished, background work
    /// and post-hook included, then drain and recreate the background pool
    /// so the runner is reusable. Returns immediately if the runner was
    /// never started or has already finished; joining twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::DeadlockRisk` when called from the foreground
    /// consumer thread: the join would wait on hooks only that thread can
    /// run.
    pub fn wait_to_finish(&self) -> Result<(), TaskError> {
        if self.foreground.is_foreground_thread() {
            return Err(TaskError::DeadlockRisk);
        }
        if *self.shared.phase.lock() == Phase::Idle {
            return Ok(());
        }

        self.shared.gate.wait();
        self.pool.drain_and_restart();
        Ok(())
    }

    /// Trip the current lifecycle's cancel token. Cooperative: background
    /// work observes the token at its own pace.
    pub fn cancel(&self) {
        self.shared.cancel.lock().cancel();
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        *self.shared.phase.lock()
    }

    /// Observer handle to the most recent job, if any.
    #[must_use]
    pub fn job(&self) -> Option<JobHandle> {
        self.shared.job.lock().clone()
    }
}

/// Resolve the job and schedule the post-hook, opening the gate afterwards.
fn finish_lifecycle<T: AsyncTask>(
    foreground: &Arc<ForegroundContext>,
    shared: &Arc<RunnerShared>,
    task: &Arc<T>,
    job: &JobHandle,
    outcome: JobOutcome,
) {
    job.resolve(outcome.clone());
    *shared.phase.lock() = Phase::PostExecute;

    let task = Arc::clone(task);
    let shared_fg = Arc::clone(shared);
    let job_id = job.id();
    let scheduled = foreground.submit(move || {
        debug!(job_id = %job_id, "on_post_execute");
        task.on_post_execute(&outcome);
        *shared_fg.phase.lock() = Phase::Completed;
        shared_fg.gate.open();
    });

    if scheduled.is_err() {
        // Foreground already gone; open the gate so joins cannot hang.
        error!("foreground context shut down before on_post_execute");
        *shared.phase.lock() = Phase::Completed;
        shared.gate.open();
    }
}
