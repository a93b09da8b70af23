//! Lazy default logger. Nothing in this file calls `init`, so the first
//! logging call installs the console default.

use rotalog::global::{DEBUG_ENV, default_level};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn logging_before_init_installs_the_default() {
    rotalog::info!("before init ", 1);
    rotalog::debugf!("{:?}", vec![1, 2, 3]);
    rotalog::warnf!("warn {}", "text");
    rotalog::error!("error", ' ', false);

    assert!(rotalog::is_initialized());
    let logger = rotalog::logger();
    assert_eq!(logger.output_count(), 1);
    assert_eq!(
        logger.min_level(),
        default_level(std::env::var_os(DEBUG_ENV).as_deref())
    );
}

#[test]
fn concurrent_first_use_sees_one_instance() {
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                rotalog::default();
                rotalog::logger()
            })
        })
        .collect();

    let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for logger in &loggers[1..] {
        assert!(Arc::ptr_eq(&loggers[0], logger));
    }
    assert!(Arc::ptr_eq(&loggers[0], &rotalog::logger()));
}

#[test]
fn logger_handle_is_the_installed_default() {
    let first = rotalog::logger();
    assert!(rotalog::is_initialized());
    assert!(Arc::ptr_eq(&first, &rotalog::logger()));
    assert_eq!(
        first.min_level(),
        default_level(std::env::var_os(DEBUG_ENV).as_deref())
    );
}
