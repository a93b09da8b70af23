//! rotalog's own diagnostic logger. Rotation housekeeping and sink failures
//! happen behind an infallible logging call, so they are reported here, on
//! stderr, instead of being returned.
//!
//! The level comes from `ROTALOG_INTERNAL_LEVEL` (default `warn`). `OnceLock`
//! builds the logger exactly once, on first use.

use crate::level::Level;
use crate::logger::Logger;
use crate::output::{EncoderConfig, Target};
use std::sync::OnceLock;

/// Environment variable selecting the diagnostics level.
pub const LEVEL_ENV: &str = "ROTALOG_INTERNAL_LEVEL";

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

fn logger() -> &'static Logger {
    INTERNAL_LOGGER.get_or_init(|| {
        let level = std::env::var(LEVEL_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::Warn);
        build_internal_logger(level)
    })
}

fn build_internal_logger(level: Level) -> Logger {
    let mut logger = Logger::builder()
        .level(level)
        .terminal()
        .target(Target::Stderr)
        .encoder(EncoderConfig::development().caller(false))
        .done()
        .build();
    // A failing stderr must not report its failure back to itself.
    logger.quiet_errors = true;
    logger
}

fn log(level: Level, scope: &str, msg: &str) {
    let logger = logger();
    if logger.enabled(level) {
        logger.log(level, &format!("rotalog {scope}: {msg}"));
    }
}

/// Visible only when diagnostics are at `debug`.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Non-fatal anomalies: a failed compression, an unremovable backup.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// A record could not be written to a sink.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
