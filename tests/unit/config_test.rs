//! Unit tests for configuration validation and parsing.

use raywatch::config::{MonitorConfig, PoolConfig};

fn monitor_json(width: u32, threads: u32) -> String {
    format!(
        r#"{{
            "update_interval_ms": 250,
            "resolution": {{ "width": {width}, "height": 480 }},
            "num_threads": {threads},
            "samples": {{ "samples_pixel": 8, "samples_light": 1 }},
            "scene": {{ "primitives": 12000, "lights": 2 }}
        }}"#
    )
}

#[test]
fn monitor_config_parses_from_json() {
    let cfg = MonitorConfig::from_json_str(&monitor_json(640, 4)).unwrap();
    assert_eq!(cfg.resolution.width, 640);
    assert_eq!(cfg.samples.samples_pixel, 8);
    assert_eq!(cfg.scene.primitives, 12_000);
}

#[test]
fn monitor_config_rejects_zero_resolution() {
    let err = MonitorConfig::from_json_str(&monitor_json(0, 4)).unwrap_err();
    assert!(err.contains("resolution"));
}

#[test]
fn monitor_config_rejects_zero_threads() {
    let err = MonitorConfig::from_json_str(&monitor_json(640, 0)).unwrap_err();
    assert!(err.contains("num_threads"));
}

#[test]
fn zero_update_interval_is_allowed() {
    let mut cfg = MonitorConfig::from_json_str(&monitor_json(640, 4)).unwrap();
    cfg.update_interval_ms = 0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn pool_config_builder_chain() {
    let cfg = PoolConfig::new()
        .with_worker_count(2)
        .with_max_queue_depth(32)
        .with_thread_stack_size(1024 * 1024);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.worker_count, 2);
    assert_eq!(cfg.max_queue_depth, 32);
}

#[test]
fn pool_config_rejects_zero_queue_depth() {
    let cfg = PoolConfig::new().with_max_queue_depth(0);
    assert!(cfg.validate().is_err());
}
