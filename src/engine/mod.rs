//! The external rendering engine boundary and host probes.
//!
//! The engine is an opaque collaborator, typically reached through a
//! foreign-function boundary. This module defines the narrow query surface
//! the monitor consumes and the host-side probes for memory and time.

use tracing::warn;

/// States the external rendering engine reports.
///
/// The numeric ids mirror the engine's native status codes. The monitor
/// treats any non-[`Busy`](Self::Busy) value as a stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// The engine is idle.
    Idle,
    /// The engine is rendering.
    Busy,
    /// The engine ended rendering.
    Finished,
    /// The engine was stopped.
    Stopped,
}

impl EngineState {
    /// The native status code for this state.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Idle => 0,
            Self::Busy => 1,
            Self::Finished => 2,
            Self::Stopped => 3,
        }
    }

    /// Map a native status code to a state.
    ///
    /// Unknown codes map to [`Stopped`](Self::Stopped): an engine reporting
    /// garbage must read as a stop signal, never as busy.
    #[must_use]
    pub fn from_id(id: i32) -> Self {
        match id {
            0 => Self::Idle,
            1 => Self::Busy,
            2 => Self::Finished,
            3 => Self::Stopped,
            other => {
                warn!(id = other, "unknown engine state id");
                Self::Stopped
            }
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Busy => "BUSY",
            Self::Finished => "FINISHED",
            Self::Stopped => "STOPPED",
        };
        write!(f, "{name}")
    }
}

/// Query surface of the external rendering engine.
///
/// Implementations wrap the engine's FFI getters; all methods are cheap
/// reads of engine-owned counters.
pub trait RenderEngine: Send + Sync {
    /// Frames per second the engine reports for its own render loop.
    fn fps(&self) -> f32;

    /// Milliseconds the engine spent constructing the renderer.
    fn time_renderer_ms(&self) -> u64;

    /// The current sample index for all pixels.
    fn sample(&self) -> u32;

    /// The engine's current state.
    fn state(&self) -> EngineState;
}

/// Host-process memory probe.
pub trait HostProbe: Send + Sync {
    /// Bytes currently allocated by the host process.
    fn allocated_memory_bytes(&self) -> u64;
}

/// Probe reading resident-set size from `/proc/self/statm` on Linux.
///
/// Returns 0 on platforms without procfs; the display then shows `0mb`,
/// matching an engine that exposes no allocator statistics.
#[derive(Debug, Default)]
pub struct ProcessMemoryProbe;

impl ProcessMemoryProbe {
    /// Create a probe for the current process.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HostProbe for ProcessMemoryProbe {
    fn allocated_memory_bytes(&self) -> u64 {
        #[cfg(target_os = "linux")]
        {
            // statm field 1 is resident pages.
            if let Ok(statm) = std::fs::read_to_string("/proc/self/statm") {
                if let Some(resident) = statm.split_whitespace().nth(1) {
                    if let Ok(pages) = resident.parse::<u64>() {
                        return pages * 4096;
                    }
                }
            }
            0
        }
        #[cfg(not(target_os = "linux"))]
        {
            0
        }
    }
}
