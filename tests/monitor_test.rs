//! Integration tests for the periodic render monitor
//!
//! These tests validate the concrete monitoring behavior:
//! - Tick counting against a scripted engine state sequence
//! - Stop on the first non-busy engine state, with no extra ticks
//! - External cancellation as an independent stop trigger
//! - Stats block round-trips and memory formatting

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use raywatch::builders::MonitorBuilder;
use raywatch::config::{MonitorConfig, PoolConfig, Resolution, Samples, SceneStats};
use raywatch::core::{ForegroundContext, JobOutcome, TaskRunner};
use raywatch::engine::{EngineState, HostProbe, RenderEngine};
use raywatch::monitor::{DisplaySink, MonitorPhase, RenderMonitor};

// ============================================================================
// TEST COLLABORATORS
// ============================================================================

/// Engine replaying a fixed state sequence, sticky on the last entry.
struct ScriptedEngine {
    states: Vec<EngineState>,
    cursor: AtomicUsize,
    fps: f32,
    renderer_ms: u64,
}

impl ScriptedEngine {
    fn new(states: Vec<EngineState>, fps: f32, renderer_ms: u64) -> Self {
        Self {
            states,
            cursor: AtomicUsize::new(0),
            fps,
            renderer_ms,
        }
    }

    fn state_queries(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RenderEngine for ScriptedEngine {
    fn fps(&self) -> f32 {
        self.fps
    }

    fn time_renderer_ms(&self) -> u64 {
        self.renderer_ms
    }

    fn sample(&self) -> u32 {
        u32::try_from(self.cursor.load(Ordering::SeqCst)).unwrap_or(u32::MAX)
    }

    fn state(&self) -> EngineState {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.states[idx.min(self.states.len() - 1)]
    }
}

/// Fixed-size memory probe.
struct FixedProbe(u64);

impl HostProbe for FixedProbe {
    fn allocated_memory_bytes(&self) -> u64 {
        self.0
    }
}

/// Display sink collecting every text update.
#[derive(Default)]
struct CollectingDisplay {
    texts: Mutex<Vec<String>>,
}

impl CollectingDisplay {
    fn last(&self) -> Option<String> {
        self.texts.lock().last().cloned()
    }
}

impl DisplaySink for CollectingDisplay {
    fn set_text(&self, text: &str) {
        self.texts.lock().push(text.to_owned());
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn config(update_interval_ms: u64) -> MonitorConfig {
    MonitorConfig {
        update_interval_ms,
        resolution: Resolution {
            width: 640,
            height: 480,
        },
        num_threads: 4,
        samples: Samples {
            samples_pixel: 8,
            samples_light: 1,
        },
        scene: SceneStats {
            primitives: 12_000,
            lights: 2,
        },
    }
}

struct Harness {
    engine: Arc<ScriptedEngine>,
    display: Arc<CollectingDisplay>,
    monitor: Arc<RenderMonitor>,
    runner: TaskRunner<RenderMonitor>,
    redraws: Arc<AtomicUsize>,
    finishes: Arc<AtomicUsize>,
}

fn harness(interval_ms: u64, states: Vec<EngineState>) -> Harness {
    let engine = Arc::new(ScriptedEngine::new(states, 29.98, 1534));
    let display = Arc::new(CollectingDisplay::default());
    let redraws = Arc::new(AtomicUsize::new(0));
    let finishes = Arc::new(AtomicUsize::new(0));

    let redraw_count = Arc::clone(&redraws);
    let finish_count = Arc::clone(&finishes);
    let monitor = MonitorBuilder::new(config(interval_ms))
        .engine(Arc::clone(&engine) as Arc<dyn RenderEngine>)
        .display(Arc::clone(&display) as Arc<dyn DisplaySink>)
        .host_probe(Arc::new(FixedProbe(10_485_760)))
        .on_redraw(move || {
            redraw_count.fetch_add(1, Ordering::SeqCst);
        })
        .on_finish(move || {
            finish_count.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let monitor = Arc::new(monitor);
    let foreground = Arc::new(ForegroundContext::new());
    let runner = TaskRunner::new(
        Arc::clone(&monitor),
        foreground,
        PoolConfig::new().with_worker_count(1),
    )
    .unwrap();

    Harness {
        engine,
        display,
        monitor,
        runner,
        redraws,
        finishes,
    }
}

/// Extract the substring between `start` and `end`, after `start`'s first
/// occurrence.
fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).expect("start marker") + start.len();
    let rest = &text[from..];
    let to = rest.find(end).expect("end marker");
    &rest[..to]
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn ticks_exactly_until_first_non_busy_state() {
    let h = harness(
        100,
        vec![
            EngineState::Busy,
            EngineState::Busy,
            EngineState::Busy,
            EngineState::Finished,
        ],
    );

    h.runner.start().unwrap();
    h.runner.wait_to_finish().unwrap();

    assert_eq!(h.engine.state_queries(), 4, "one query per tick");
    assert_eq!(h.monitor.monitor_phase(), MonitorPhase::Stopped);
    assert_eq!(h.finishes.load(Ordering::SeqCst), 1);
    // Four tick redraws plus the final post-execute redraw.
    assert_eq!(h.redraws.load(Ordering::SeqCst), 5);

    // The timer is cancelled: no tick 5 arrives later.
    std::thread::sleep(Duration::from_millis(350));
    assert_eq!(h.engine.state_queries(), 4);
}

#[test]
fn zero_interval_is_clamped_and_still_terminates() {
    let h = harness(0, vec![EngineState::Finished]);

    h.runner.start().unwrap();
    h.runner.wait_to_finish().unwrap();

    assert_eq!(h.engine.state_queries(), 1);
    assert_eq!(h.monitor.monitor_phase(), MonitorPhase::Stopped);
}

#[test]
fn external_cancel_stops_a_busy_engine_monitor() {
    // Engine never leaves Busy; only the cancel token can stop the loop.
    let h = harness(20, vec![EngineState::Busy]);

    let job = h.runner.start().unwrap();
    std::thread::sleep(Duration::from_millis(100));
    h.runner.cancel();
    h.runner.wait_to_finish().unwrap();

    assert_eq!(job.outcome(), Some(JobOutcome::Cancelled));
    assert_eq!(h.monitor.monitor_phase(), MonitorPhase::Stopped);
    assert_eq!(h.finishes.load(Ordering::SeqCst), 1, "finish runs on cancel too");

    let queries = h.engine.state_queries();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(h.engine.state_queries(), queries, "no ticks after cancel");
}

#[test]
fn stats_block_round_trips_within_rounding_tolerance() {
    let h = harness(
        50,
        vec![EngineState::Busy, EngineState::Busy, EngineState::Finished],
    );

    h.runner.start().unwrap();
    h.runner.wait_to_finish().unwrap();

    let snapshot = h.monitor.snapshot();
    let text = snapshot.text.as_str();
    let (line1, line2) = text.split_once('\n').expect("two-line block");

    let engine_fps: f64 = between(line1, "fps:", "[").parse().unwrap();
    let local_fps: f64 = between(line1, "[", "]").parse().unwrap();
    let sample: u32 = line1.rsplit(',').next().unwrap().parse().unwrap();
    let state = line2.split(',').next().unwrap();
    let memory_mb: u64 = between(line2, ",m:", "mb").parse().unwrap();
    let renderer_secs: f64 = between(line2, ",t:", "[").parse().unwrap();
    let elapsed_secs: f64 = between(line2, "[", "]").parse().unwrap();

    assert!((engine_fps - snapshot.engine_fps).abs() < 0.01);
    assert!((local_fps - snapshot.local_fps).abs() < 0.01);
    assert!((renderer_secs - snapshot.renderer_secs).abs() < 0.01);
    assert!((elapsed_secs - snapshot.elapsed_secs).abs() < 0.01);
    assert_eq!(sample, snapshot.sample);
    assert_eq!(memory_mb, snapshot.memory_mb);
    assert_eq!(state, snapshot.state.to_string());
    assert_eq!(state, "FINISHED");
}

#[test]
fn memory_displays_whole_megabytes() {
    let h = harness(10, vec![EngineState::Finished]);

    h.runner.start().unwrap();
    h.runner.wait_to_finish().unwrap();

    // 10_485_760 bytes is exactly 10mb under integer division.
    let snapshot = h.monitor.snapshot();
    assert_eq!(snapshot.memory_mb, 10);
    assert!(snapshot.text.contains(",m:10mb"));
}

#[test]
fn display_shows_the_final_snapshot_after_completion() {
    let h = harness(
        30,
        vec![EngineState::Busy, EngineState::Busy, EngineState::Stopped],
    );

    h.runner.start().unwrap();
    h.runner.wait_to_finish().unwrap();

    let last = h.display.last().expect("display received updates");
    assert_eq!(last, h.monitor.snapshot().text);
    assert!(last.contains("STOPPED"));
    assert!(last.contains(",r:640x480,t:4,spp:8,spl:1"));
    assert!(last.contains(",p=12000,l=2"));
}
