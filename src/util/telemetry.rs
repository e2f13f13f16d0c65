//! Telemetry helpers for structured logging and tracing.

/// Install a default env-filtered fmt subscriber if none is set.
///
/// Applications embedding this crate usually install their own subscriber;
/// this helper exists for binaries and tests that want sensible output with
/// no setup. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
