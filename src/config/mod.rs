//! Configuration models for monitors and worker pools.

pub mod monitor;
pub mod pool;

pub use monitor::{MonitorConfig, Resolution, Samples, SceneStats};
pub use pool::PoolConfig;
