//! Fixed-rate monitor that polls the rendering engine and publishes stats.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::core::{AsyncTask, JobOutcome, ProgressPublisher, TaskContext, TaskError};
use crate::engine::{EngineState, HostProbe, RenderEngine};
use crate::util::clock::Clock;
use crate::util::format::bytes_to_megabytes;

use super::stats::{format_block, FrameCounter, StaticLabels, StatsSnapshot};

/// States of a monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Constructed; the timer has not been scheduled yet.
    Armed,
    /// The recurring timer is live and sampling the engine.
    Ticking,
    /// A stop condition was observed; no further ticks will run.
    Stopping,
    /// The finish callback has run and the session is over.
    Stopped,
}

/// Sink for the formatted stats block, updated on the foreground context.
pub trait DisplaySink: Send + Sync {
    /// Replace the displayed text.
    fn set_text(&self, text: &str);
}

/// Callback requesting a redraw of the host's display surface.
pub type RedrawCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback run once when the session stops: stops the engine and resets
/// the collaborator-owned error indicator.
pub type FinishCallback = Arc<dyn Fn() + Send + Sync>;

/// Timer-internal state, touched only by the tick in the background context.
struct MonitorInner {
    phase: MonitorPhase,
    frames: FrameCounter,
    started_at_ms: u64,
}

/// Periodic render-progress monitor.
///
/// Implements [`AsyncTask`]: `background_work` arms a fixed-rate timer
/// (first fire immediate) and each tick samples the engine, derives frame
/// metrics, formats the stats block, requests a redraw, and publishes
/// progress. The loop exits when the engine reports any non-busy state or
/// the task's cancel token trips; the finish callback then stops the engine
/// and the job resolves, unblocking `wait_to_finish`.
pub struct RenderMonitor {
    engine: Arc<dyn RenderEngine>,
    host: Arc<dyn HostProbe>,
    clock: Arc<dyn Clock>,
    display: Arc<dyn DisplaySink>,
    request_redraw: RedrawCallback,
    on_finish: FinishCallback,
    update_interval_ms: u64,
    labels: StaticLabels,
    inner: Mutex<MonitorInner>,
    snapshot: Mutex<StatsSnapshot>,
}

impl RenderMonitor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        update_interval_ms: u64,
        labels: StaticLabels,
        engine: Arc<dyn RenderEngine>,
        host: Arc<dyn HostProbe>,
        clock: Arc<dyn Clock>,
        display: Arc<dyn DisplaySink>,
        request_redraw: RedrawCallback,
        on_finish: FinishCallback,
    ) -> Self {
        let memory_mb = bytes_to_megabytes(host.allocated_memory_bytes());
        let snapshot = StatsSnapshot::initial(memory_mb, &labels);
        let now = clock.now_millis();

        Self {
            engine,
            host,
            clock,
            display,
            request_redraw,
            on_finish,
            update_interval_ms,
            labels,
            inner: Mutex::new(MonitorInner {
                phase: MonitorPhase::Armed,
                frames: FrameCounter::new(now),
                started_at_ms: now,
            }),
            snapshot: Mutex::new(snapshot),
        }
    }

    /// The metrics captured by the most recent tick.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot.lock().clone()
    }

    /// Current session phase.
    #[must_use]
    pub fn monitor_phase(&self) -> MonitorPhase {
        self.inner.lock().phase
    }

    /// Reset counters for a fresh session and mark the timer live.
    fn arm(&self) {
        let now = self.clock.now_millis();
        let mut inner = self.inner.lock();
        inner.phase = MonitorPhase::Ticking;
        inner.frames = FrameCounter::new(now);
        inner.started_at_ms = now;
        drop(inner);

        let memory_mb = bytes_to_megabytes(self.host.allocated_memory_bytes());
        *self.snapshot.lock() = StatsSnapshot::initial(memory_mb, &self.labels);
    }

    /// One sampling step. Returns the phase after the step.
    fn tick(&self, progress: &ProgressPublisher) -> MonitorPhase {
        let now = self.clock.now_millis();

        let (local_fps, started_at) = {
            let mut inner = self.inner.lock();
            (inner.frames.tick(now), inner.started_at_ms)
        };

        let state = self.engine.state();
        let mut snapshot = StatsSnapshot {
            text: String::new(),
            engine_fps: f64::from(self.engine.fps()),
            local_fps,
            renderer_secs: self.engine.time_renderer_ms() as f64 / 1000.0,
            elapsed_secs: now.saturating_sub(started_at) as f64 / 1000.0,
            memory_mb: bytes_to_megabytes(self.host.allocated_memory_bytes()),
            sample: self.engine.sample(),
            state,
        };
        snapshot.text = format_block(&self.labels, &snapshot);
        debug!(sample = snapshot.sample, state = %state, "tick");
        *self.snapshot.lock() = snapshot;

        (self.request_redraw)();
        progress.publish();

        if state == EngineState::Busy {
            MonitorPhase::Ticking
        } else {
            info!(state = %state, "engine no longer busy, stopping monitor");
            self.inner.lock().phase = MonitorPhase::Stopping;
            MonitorPhase::Stopping
        }
    }

    /// Run the finish callback and close the session.
    fn finish(&self) {
        (self.on_finish)();
        self.inner.lock().phase = MonitorPhase::Stopped;
        info!("render monitor stopped");
    }
}

#[async_trait]
impl AsyncTask for RenderMonitor {
    fn on_pre_execute(&self) {
        debug!("render monitor pre-execute");
    }

    async fn background_work(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        self.arm();
        info!(
            interval_ms = self.update_interval_ms,
            "render monitor armed"
        );

        let period = Duration::from_millis(self.update_interval_ms.max(1));
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            if ctx.cancel.is_cancelled() {
                debug!("render monitor cancelled externally");
                self.inner.lock().phase = MonitorPhase::Stopping;
                break;
            }
            if self.tick(&ctx.progress) != MonitorPhase::Ticking {
                break;
            }
        }

        self.finish();
        Ok(())
    }

    fn on_progress_update(&self) {
        let text = self.snapshot.lock().text.clone();
        self.display.set_text(&text);
    }

    fn on_post_execute(&self, outcome: &JobOutcome) {
        if let JobOutcome::Failed(reason) = outcome {
            error!(reason = %reason, "render monitor lifecycle failed");
        }
        let text = self.snapshot.lock().text.clone();
        self.display.set_text(&text);
        (self.request_redraw)();
    }
}
