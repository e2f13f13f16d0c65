//! # Raywatch
//!
//! Asynchronous task lifecycle and periodic render-progress monitoring for
//! ray tracing engines.
//!
//! This library provides the task-scheduling layer that long-running render
//! operations are built on: a four-phase asynchronous task contract, two
//! scheduler contexts (a serialized foreground queue and a background worker
//! pool), a fire-and-forget progress publisher, a blocking completion gate,
//! and — the concrete instantiation — a fixed-rate monitor that samples an
//! external rendering engine's state, derives frame metrics, and stops
//! itself once the engine is no longer busy.
//!
//! ## Core Problem Solved
//!
//! Rendering workloads run for seconds to minutes on native threads behind an
//! FFI boundary, while the owning application needs a steady stream of
//! diagnostics (fps, sample index, memory, elapsed time) on a single ordered
//! "owner" thread:
//!
//! - **Two execution contexts**: compute work must never run on the owner
//!   thread, and owner-thread callbacks must never overlap each other
//! - **Deterministic join**: callers need a blocking `wait_to_finish` that
//!   guarantees the whole lifecycle, including the final foreground hook,
//!   has run
//! - **Self-terminating polling**: the progress monitor owns its timer and
//!   stops on an engine state change or an external cancel signal
//!
//! ## AsyncTask - Four-Phase Lifecycle
//!
//! [`core::AsyncTask`] is the extension point: `on_pre_execute` (foreground),
//! `background_work` (worker pool, may publish progress), `on_progress_update`
//! (foreground, once per delivered publication), `on_post_execute`
//! (foreground, receives the typed outcome).
//!
//! ```rust,ignore
//! use raywatch::core::{ForegroundContext, TaskRunner};
//! use raywatch::config::PoolConfig;
//! use std::sync::Arc;
//!
//! let foreground = Arc::new(ForegroundContext::new());
//! let runner = TaskRunner::new(Arc::new(my_task), foreground, PoolConfig::new())?;
//!
//! runner.start()?;          // never blocks
//! runner.wait_to_finish()?; // blocks until on_post_execute has run
//! ```
//!
//! ## RenderMonitor - Fixed-Rate Engine Polling
//!
//! [`monitor::RenderMonitor`] implements [`core::AsyncTask`]: each tick it
//! derives an instantaneous fps, queries the engine and the host allocator,
//! formats a stats block, requests a redraw, and publishes progress. The tick
//! loop exits when the engine reports any non-busy state or when the task's
//! cancel token trips.
//!
//! For complete examples, see:
//! - `tests/task_lifecycle_test.rs` - Lifecycle ordering and join semantics
//! - `tests/monitor_test.rs` - Tick counting and stats round-trips

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core task lifecycle, scheduler contexts, and completion primitives.
pub mod core;
/// Configuration models for monitors and worker pools.
pub mod config;
/// Builders to construct monitors from configuration and collaborators.
pub mod builders;
/// The external rendering engine boundary and host probes.
pub mod engine;
/// The periodic render-progress monitor.
pub mod monitor;
/// Shared utilities.
pub mod util;
