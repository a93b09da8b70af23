//! Explicit initialization of the global logger.
//!
//! The global slot is process-wide, so everything that replaces it lives in a
//! single test to keep the steps ordered.

use rotalog::{Level, LoggerConfig, RotationMode};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn init_routes_facade_calls_to_the_configured_file() {
    let dir = tempdir().unwrap();

    // Size rolling.
    let size_path = dir.path().join("size.log");
    let installed =
        rotalog::try_size_rolling(&size_path.to_string_lossy(), "debug", 1, 2, 3, false).unwrap();
    assert!(rotalog::is_initialized());
    assert!(Arc::ptr_eq(&installed, &rotalog::logger()));
    assert_eq!(rotalog::logger().min_level(), Level::Debug);

    rotalog::infof!("{} {}", "hello", "world");
    rotalog::debug!("user=", 28);
    rotalog::errorf!("{:?}", 5);

    let content = fs::read_to_string(&size_path).unwrap();
    let messages: Vec<&str> = content
        .lines()
        .map(|l| l.rsplit('\t').next().unwrap())
        .collect();
    assert_eq!(messages, vec!["hello world", "user=28", "5"]);
    assert!(content.contains("\tINFO\t"));
    assert!(content.contains("\tDEBUG\t"));
    assert!(content.contains("tests/global_init.rs:"));

    // Date rolling replaces the previous logger.
    let date_path = dir.path().join("date.log");
    rotalog::date_rolling(&date_path.to_string_lossy(), "warn", 10, 3, false);
    assert_eq!(rotalog::logger().min_level(), Level::Warn);

    rotalog::info!("filtered");
    rotalog::warn!("kept");

    let today = chrono::Local::now().format("%Y%m%d").to_string();
    let dated = fs::read_to_string(dir.path().join(format!("date.{today}.log"))).unwrap();
    assert!(!dated.contains("filtered"));
    assert!(dated.trim_end().ends_with("kept"));

    // init dispatches on the rotation mode.
    let init_path = dir.path().join("init.log");
    rotalog::init(
        &LoggerConfig::new(init_path.to_string_lossy())
            .level("bogus")
            .rotation(RotationMode::BySize),
    );
    assert_eq!(rotalog::logger().min_level(), Level::Info);
    rotalog::info!("via init");
    assert!(fs::read_to_string(&init_path).unwrap().contains("via init"));

    // The default never overrides an explicit logger.
    rotalog::default();
    rotalog::info!("still file");
    assert!(fs::read_to_string(&init_path).unwrap().contains("still file"));

    // A failed setup leaves the installed logger in place.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    assert!(rotalog::try_size_rolling(&blocker.join("a.log").to_string_lossy(), "info", 1, 0, 0, false).is_err());
    rotalog::info!("after failure");
    assert!(fs::read_to_string(&init_path).unwrap().contains("after failure"));
}
