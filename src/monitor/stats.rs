//! Tick statistics and the fixed-layout stats block.

use crate::config::MonitorConfig;
use crate::engine::EngineState;
use crate::util::format::format_metric;

/// Static label fragments, pre-rendered once per monitoring session.
#[derive(Debug)]
pub(crate) struct StaticLabels {
    /// `,r:WxH`
    pub resolution: String,
    /// `,t:N`
    pub threads: String,
    /// `,spp:N`
    pub samples_pixel: String,
    /// `,spl:N`
    pub samples_light: String,
    /// `,p=N,l=M`
    pub scene: String,
}

impl StaticLabels {
    pub(crate) fn from_config(cfg: &MonitorConfig) -> Self {
        Self {
            resolution: format!(",r:{}x{}", cfg.resolution.width, cfg.resolution.height),
            threads: format!(",t:{}", cfg.num_threads),
            samples_pixel: format!(",spp:{}", cfg.samples.samples_pixel),
            samples_light: format!(",spl:{}", cfg.samples.samples_light),
            scene: format!(",p={},l={}", cfg.scene.primitives, cfg.scene.lights),
        }
    }
}

/// Metrics captured by the most recent tick, plus their formatted rendering.
///
/// Written only by the tick running on the background context; read only by
/// the foreground progress hook, through a mutex-guarded slot.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// The formatted two-line stats block.
    pub text: String,
    /// Fps reported by the engine.
    pub engine_fps: f64,
    /// Fps derived locally from tick cadence.
    pub local_fps: f64,
    /// Seconds the engine spent constructing the renderer.
    pub renderer_secs: f64,
    /// Wall-clock seconds since the monitoring session started.
    pub elapsed_secs: f64,
    /// Host allocated memory in whole megabytes.
    pub memory_mb: u64,
    /// Current sample index for all pixels.
    pub sample: u32,
    /// Engine state observed by the tick.
    pub state: EngineState,
}

impl StatsSnapshot {
    /// Snapshot shown before the first tick: all metrics zero, engine idle.
    pub(crate) fn initial(memory_mb: u64, labels: &StaticLabels) -> Self {
        let mut snapshot = Self {
            text: String::new(),
            engine_fps: 0.0,
            local_fps: 0.0,
            renderer_secs: 0.0,
            elapsed_secs: 0.0,
            memory_mb,
            sample: 0,
            state: EngineState::Idle,
        };
        snapshot.text = format_block(labels, &snapshot);
        snapshot
    }
}

/// Frame counter deriving an instantaneous fps from tick cadence.
///
/// The counter resets each time more than one second has elapsed since the
/// time base, so the reading tracks the current second rather than the
/// session average.
#[derive(Debug)]
pub(crate) struct FrameCounter {
    frame: u32,
    timebase_ms: u64,
}

impl FrameCounter {
    pub(crate) const fn new(now_ms: u64) -> Self {
        Self {
            frame: 0,
            timebase_ms: now_ms,
        }
    }

    /// Count one tick at `now_ms` and return the instantaneous fps.
    pub(crate) fn tick(&mut self, now_ms: u64) -> f64 {
        self.frame += 1;
        let elapsed = now_ms.saturating_sub(self.timebase_ms);
        let fps = instantaneous_fps(self.frame, elapsed);
        if elapsed > 1000 {
            self.timebase_ms = now_ms;
            self.frame = 0;
        }
        fps
    }
}

/// `frames * 1000 / elapsed`, guarding the degenerate zero-delta tick.
pub(crate) fn instantaneous_fps(frames: u32, elapsed_ms: u64) -> f64 {
    f64::from(frames) * 1000.0 / elapsed_ms.max(1) as f64
}

/// Render the two-line stats block.
///
/// Line 1: engine fps, bracketed local fps, resolution, thread count,
/// samples per pixel, samples per light, current sample index.
/// Line 2: engine state, allocated memory, renderer construction seconds,
/// bracketed elapsed wall seconds, scene composition.
pub(crate) fn format_block(labels: &StaticLabels, snap: &StatsSnapshot) -> String {
    format!(
        "fps:{}[{}]{}{}{}{},{}\n{},m:{}mb,t:{}[{}]{}",
        format_metric(snap.engine_fps),
        format_metric(snap.local_fps),
        labels.resolution,
        labels.threads,
        labels.samples_pixel,
        labels.samples_light,
        snap.sample,
        snap.state,
        snap.memory_mb,
        format_metric(snap.renderer_secs),
        format_metric(snap.elapsed_secs),
        labels.scene,
    )
}
