//! Monitor configuration and render value objects.

use serde::{Deserialize, Serialize};

/// Width and height of the surface the engine renders into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Selected sampling rates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Samples {
    /// Samples per pixel.
    pub samples_pixel: u32,
    /// Samples per light.
    pub samples_light: u32,
}

/// Scene composition counters shown in the stats block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneStats {
    /// Number of primitives in the scene.
    pub primitives: u64,
    /// Number of lights in the scene.
    pub lights: u64,
}

/// Configuration for a [`RenderMonitor`](crate::monitor::RenderMonitor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interval between ticks, in milliseconds. Zero means "as fast as the
    /// scheduler allows" and is clamped to 1 ms by the timer.
    pub update_interval_ms: u64,
    /// Render surface resolution.
    pub resolution: Resolution,
    /// Number of engine rendering threads.
    pub num_threads: u32,
    /// Sampling rates.
    pub samples: Samples,
    /// Scene composition counters.
    pub scene: SceneStats,
}

impl MonitorConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err("resolution must be non-zero in both dimensions".into());
        }
        if self.num_threads == 0 {
            return Err("num_threads must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse a monitor configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
