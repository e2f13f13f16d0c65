//! Fire-and-forget progress publication onto the foreground context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use super::foreground::ForegroundContext;

/// Schedules a task's `on_progress_update` hook onto the foreground context.
///
/// `publish` never blocks and may be called any number of times from inside
/// background work. Deliveries are FIFO relative to each other; while one
/// delivery is queued and not yet run, further publishes coalesce into it.
/// The hook reads the latest published data, so coalescing is last-write-wins
/// by construction.
#[derive(Clone)]
pub struct ProgressPublisher {
    foreground: Arc<ForegroundContext>,
    hook: Arc<dyn Fn() + Send + Sync>,
    pending: Arc<AtomicBool>,
}

impl ProgressPublisher {
    /// Create a publisher that delivers to the given hook on `foreground`.
    pub fn new(foreground: Arc<ForegroundContext>, hook: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            foreground,
            hook,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Schedule one delivery of the progress hook. Fire-and-forget.
    pub fn publish(&self) {
        // Coalesce: if a delivery is already queued, this publish is absorbed
        // into it. The flag clears before the hook runs, so data written
        // after this point is picked up by the next delivery.
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }

        let hook = Arc::clone(&self.hook);
        let pending = Arc::clone(&self.pending);
        let scheduled = self.foreground.submit(move || {
            pending.store(false, Ordering::Release);
            hook();
        });

        if scheduled.is_err() {
            self.pending.store(false, Ordering::Release);
            warn!("progress publication dropped: foreground context shut down");
        }
    }
}
