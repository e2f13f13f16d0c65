//! The periodic render-progress monitor.

pub mod render_monitor;
pub(crate) mod stats;

pub use render_monitor::{
    DisplaySink, FinishCallback, MonitorPhase, RedrawCallback, RenderMonitor,
};
pub use stats::StatsSnapshot;
