//! Tests for logger functionality.

use rotalog::output::LogRecord;
use rotalog::{Level, Logger, Output};
use std::sync::{Arc, Mutex};
use std::thread;

/// Keeps every record it receives.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<LogRecord>>>);

impl Capture {
    fn messages(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

impl Output for Capture {
    fn write(&self, record: &LogRecord) -> Result<(), rotalog::Error> {
        self.0.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), rotalog::Error> {
        Ok(())
    }
}

#[test]
fn builder_default() {
    let logger = Logger::builder().build();
    assert_eq!(logger.min_level(), Level::Info);
    assert_eq!(logger.output_count(), 0);
    assert!(!logger.is_development());
}

#[test]
fn builder_with_level() {
    let logger = Logger::builder().level(Level::Debug).build();
    assert_eq!(logger.min_level(), Level::Debug);
}

#[test]
fn builder_multiple_outputs() {
    let logger = Logger::builder()
        .terminal()
        .done()
        .file(std::io::sink())
        .done()
        .build();
    assert_eq!(logger.output_count(), 2);
}

#[test]
fn log_without_outputs_does_not_panic() {
    let logger = Logger::builder().level(Level::Warn).build();
    logger.info("should be filtered");
    logger.warn("nowhere to go");
}

#[test]
fn builder_level_applies_to_sinks_without_their_own() {
    let capture = Capture::default();
    let logger = Logger::builder()
        .output(capture.clone())
        .level(Level::Warn)
        .build();

    logger.info("dropped");
    logger.warn("kept");

    assert_eq!(capture.messages(), vec!["kept"]);
}

#[test]
fn each_sink_filters_by_its_own_level() {
    let verbose = Capture::default();
    let quiet = Capture::default();
    let logger = Logger::builder()
        .output_at(verbose.clone(), Level::Debug)
        .output_at(quiet.clone(), Level::Error)
        .build();

    logger.debug("d");
    logger.warn("w");
    logger.error("e");

    assert_eq!(verbose.messages(), vec!["d", "w", "e"]);
    assert_eq!(quiet.messages(), vec!["e"]);
    assert_eq!(logger.min_level(), Level::Debug);
    assert!(logger.enabled(Level::Debug));
}

#[test]
fn records_carry_the_call_site() {
    let capture = Capture::default();
    let logger = Logger::builder().output(capture.clone()).build();

    logger.info("here");

    let records = capture.0.lock().unwrap();
    let caller = records[0].caller.expect("caller captured");
    assert!(caller.file().ends_with("logger.rs"));
}

#[test]
fn formatted_messages_skip_rendering_when_disabled() {
    struct Loud;
    impl std::fmt::Display for Loud {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("rendered a disabled record")
        }
    }

    let capture = Capture::default();
    let logger = Logger::builder().output(capture.clone()).build();

    logger.log_fmt(Level::Debug, format_args!("{}", Loud));
    logger.log_fmt(Level::Info, format_args!("n={}", 3));

    assert_eq!(capture.messages(), vec!["n=3"]);
}

#[test]
#[should_panic(expected = "broken invariant")]
fn panic_level_panics_after_writing() {
    let logger = Logger::builder().output(Capture::default()).build();
    logger.panic("broken invariant");
}

#[test]
#[should_panic(expected = "dev only")]
fn dpanic_panics_in_development() {
    let logger = Logger::builder()
        .development(true)
        .output(Capture::default())
        .build();
    logger.dpanic("dev only");
}

#[test]
fn dpanic_only_logs_in_production() {
    let capture = Capture::default();
    let logger = Logger::builder().output(capture.clone()).build();
    logger.dpanic("survives");
    assert_eq!(capture.messages(), vec!["survives"]);
}

#[test]
fn concurrent_logging_keeps_every_record() {
    let capture = Capture::default();
    let logger = Arc::new(Logger::builder().output(capture.clone()).build());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..50 {
                    logger.info(&format!("{t}-{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(capture.messages().len(), 400);
}
