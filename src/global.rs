//! Process-wide logger.
//!
//! Prefer building a [`Logger`] and passing it (or an `Arc` of it) down
//! explicitly. This module keeps the package-level convenience: one slot that
//! either [`init`] fills, or that [`default`] fills lazily the first time any
//! logging function runs. Once filled it is never emptied again; a later
//! `init` replaces the logger in it.

use crate::config::{LoggerConfig, RotationMode};
use crate::internal;
use crate::level::Level;
use crate::logger::Logger;
use crate::output::EncoderConfig;
use crate::value::{self, Value};
use std::ffi::OsStr;
use std::fmt;
use std::sync::{Arc, Once, PoisonError, RwLock};

/// Any non-empty value switches the default logger to `debug`.
pub const DEBUG_ENV: &str = "DEBUG";

static GLOBAL: RwLock<Option<Arc<Logger>>> = RwLock::new(None);
static DEFAULT: Once = Once::new();

/// Puts `logger` in the global slot, replacing whatever was there.
pub fn install(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&logger));
    logger
}

fn current() -> Option<Arc<Logger>> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(Arc::clone)
}

/// Whether `init` or `default` has filled the slot.
#[must_use]
pub fn is_initialized() -> bool {
    current().is_some()
}

/// The global logger, creating the default one first if needed.
#[must_use]
pub fn logger() -> Arc<Logger> {
    if let Some(logger) = current() {
        return logger;
    }
    default();
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slot.get_or_insert_with(|| Arc::new(env_default_logger())))
}

/// Configures the global logger from `config`, dispatching on its rotation mode.
///
/// # Errors
/// Path, pattern and I/O errors from setting up the rotating writer.
pub fn try_init(config: &LoggerConfig) -> Result<Arc<Logger>, crate::Error> {
    let logger = install(config.build()?);
    internal::info(
        "INIT",
        &format!(
            "Logging to {} at {} ({:?})",
            config.file_path,
            logger.min_level(),
            config.rotation
        ),
    );
    Ok(logger)
}

/// Like [`try_init`], but a logger that can't be set up terminates the process.
pub fn init(config: &LoggerConfig) {
    if let Err(e) = try_init(config) {
        setup_failed(&e);
    }
}

/// # Errors
/// See [`try_init`].
pub fn try_date_rolling(
    path: &str,
    level: &str,
    max_backups: u32,
    max_age_days: u32,
    stdout: bool,
) -> Result<Arc<Logger>, crate::Error> {
    let config = LoggerConfig::new(path)
        .level(level)
        .rotation(RotationMode::ByDate)
        .max_backups(max_backups)
        .max_age_days(max_age_days)
        .stdout(stdout);
    try_init(&config)
}

/// Daily files named `<stem>.%Y%m%d.<ext>`, retention chosen by
/// [`Retention::select`](crate::rolling::Retention::select). Terminates the
/// process on setup failure.
pub fn date_rolling(path: &str, level: &str, max_backups: u32, max_age_days: u32, stdout: bool) {
    if let Err(e) = try_date_rolling(path, level, max_backups, max_age_days, stdout) {
        setup_failed(&e);
    }
}

/// # Errors
/// See [`try_init`].
pub fn try_size_rolling(
    path: &str,
    level: &str,
    max_size_mb: u64,
    max_backups: u32,
    max_age_days: u32,
    stdout: bool,
) -> Result<Arc<Logger>, crate::Error> {
    let config = LoggerConfig::new(path)
        .level(level)
        .rotation(RotationMode::BySize)
        .max_size_mb(max_size_mb)
        .max_backups(max_backups)
        .max_age_days(max_age_days)
        .stdout(stdout);
    try_init(&config)
}

/// Rotates past `max_size_mb`, keeping at most `max_backups` gzipped backups
/// for at most `max_age_days`. Terminates the process on setup failure.
pub fn size_rolling(
    path: &str,
    level: &str,
    max_size_mb: u64,
    max_backups: u32,
    max_age_days: u32,
    stdout: bool,
) {
    if let Err(e) = try_size_rolling(path, level, max_size_mb, max_backups, max_age_days, stdout) {
        setup_failed(&e);
    }
}

fn setup_failed(err: &crate::Error) -> ! {
    eprintln!("rotalog: failed to set up logger: {err}");
    std::process::exit(1);
}

/// Level of the default logger for a given `DEBUG` value.
#[must_use]
pub fn default_level(debug_flag: Option<&OsStr>) -> Level {
    match debug_flag {
        Some(flag) if !flag.is_empty() => Level::Debug,
        _ => Level::Info,
    }
}

/// Console-only development logger at `level`.
#[must_use]
pub fn default_logger(level: Level) -> Logger {
    Logger::builder()
        .level(level)
        .terminal()
        .encoder(EncoderConfig::development())
        .done()
        .build()
}

fn env_default_logger() -> Logger {
    default_logger(default_level(std::env::var_os(DEBUG_ENV).as_deref()))
}

/// Installs the console logger, at most once per process, and only if nothing
/// was installed before. Safe to race from many threads.
pub fn default() {
    DEFAULT.call_once(|| {
        let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(Arc::new(env_default_logger()));
        }
    });
}

#[track_caller]
fn emit(level: Level, values: &[Value]) {
    let logger = logger();
    if level >= Level::DPanic || logger.enabled(level) {
        logger.log(level, &value::concat(values));
    }
}

#[track_caller]
pub fn debug(values: &[Value]) {
    emit(Level::Debug, values);
}

#[track_caller]
pub fn info(values: &[Value]) {
    emit(Level::Info, values);
}

#[track_caller]
pub fn warn(values: &[Value]) {
    emit(Level::Warn, values);
}

#[track_caller]
pub fn error(values: &[Value]) {
    emit(Level::Error, values);
}

/// Logs, then exits the process with status 1.
#[track_caller]
pub fn fatal(values: &[Value]) -> ! {
    emit(Level::Fatal, values);
    unreachable!("fatal level always exits")
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logger().log_fmt(Level::Debug, args);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().log_fmt(Level::Info, args);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logger().log_fmt(Level::Warn, args);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().log_fmt(Level::Error, args);
}

/// Logs, then exits the process with status 1.
#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    logger().log_fmt(Level::Fatal, args);
    unreachable!("fatal level always exits")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_must_be_non_empty() {
        assert_eq!(default_level(None), Level::Info);
        assert_eq!(default_level(Some(OsStr::new(""))), Level::Info);
        assert_eq!(default_level(Some(OsStr::new("true"))), Level::Debug);
        assert_eq!(default_level(Some(OsStr::new("0"))), Level::Debug);
    }

    #[test]
    fn default_logger_is_console_only() {
        let logger = default_logger(Level::Debug);
        assert_eq!(logger.output_count(), 1);
        assert_eq!(logger.min_level(), Level::Debug);
    }
}
