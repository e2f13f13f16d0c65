//! Builder assembling a render monitor from configuration and collaborators.

use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::core::TaskError;
use crate::engine::{HostProbe, ProcessMemoryProbe, RenderEngine};
use crate::monitor::render_monitor::{DisplaySink, FinishCallback, RedrawCallback};
use crate::monitor::stats::StaticLabels;
use crate::monitor::RenderMonitor;
use crate::util::clock::{Clock, SystemClock};

/// Builder for [`RenderMonitor`].
///
/// The engine, display sink, redraw callback, and finish callback are
/// required; the clock and memory probe default to the real host.
///
/// ```rust,ignore
/// let monitor = MonitorBuilder::new(config)
///     .engine(engine)
///     .display(display)
///     .on_redraw(move || surface.request_redraw())
///     .on_finish(move || { engine.stop(); errors.reset(); })
///     .build()?;
/// ```
pub struct MonitorBuilder {
    config: MonitorConfig,
    engine: Option<Arc<dyn RenderEngine>>,
    host: Option<Arc<dyn HostProbe>>,
    clock: Option<Arc<dyn Clock>>,
    display: Option<Arc<dyn DisplaySink>>,
    request_redraw: Option<RedrawCallback>,
    on_finish: Option<FinishCallback>,
}

impl MonitorBuilder {
    /// Start a builder from a configuration.
    #[must_use]
    pub const fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            engine: None,
            host: None,
            clock: None,
            display: None,
            request_redraw: None,
            on_finish: None,
        }
    }

    /// Set the rendering engine to poll. Required.
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn RenderEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the host memory probe. Defaults to [`ProcessMemoryProbe`].
    #[must_use]
    pub fn host_probe(mut self, host: Arc<dyn HostProbe>) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the clock. Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the display sink receiving the formatted stats. Required.
    #[must_use]
    pub fn display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    /// Set the redraw-request callback. Required.
    #[must_use]
    pub fn on_redraw<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.request_redraw = Some(Arc::new(callback));
        self
    }

    /// Set the finish callback, run once when the session stops. Required.
    #[must_use]
    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_finish = Some(Arc::new(callback));
        self
    }

    /// Validate the configuration and collaborators and build the monitor.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidConfig` naming the first missing
    /// collaborator or invalid configuration field.
    pub fn build(self) -> Result<RenderMonitor, TaskError> {
        self.config.validate().map_err(TaskError::InvalidConfig)?;

        let engine = self
            .engine
            .ok_or_else(|| TaskError::InvalidConfig("engine is required".into()))?;
        let display = self
            .display
            .ok_or_else(|| TaskError::InvalidConfig("display sink is required".into()))?;
        let request_redraw = self
            .request_redraw
            .ok_or_else(|| TaskError::InvalidConfig("redraw callback is required".into()))?;
        let on_finish = self
            .on_finish
            .ok_or_else(|| TaskError::InvalidConfig("finish callback is required".into()))?;

        let host = self
            .host
            .unwrap_or_else(|| Arc::new(ProcessMemoryProbe::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));

        Ok(RenderMonitor::from_parts(
            self.config.update_interval_ms,
            StaticLabels::from_config(&self.config),
            engine,
            host,
            clock,
            display,
            request_redraw,
            on_finish,
        ))
    }
}
