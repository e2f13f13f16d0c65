//! Builders to construct monitors from configuration and collaborators.

pub mod monitor_builder;

pub use monitor_builder::MonitorBuilder;
