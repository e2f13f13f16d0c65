//! Shared utilities.

pub mod clock;
pub mod format;
pub mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{bytes_to_megabytes, format_metric, BYTES_IN_MEGABYTE};
pub use telemetry::init_tracing;
