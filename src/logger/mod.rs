//! The resulting Logger of a builder fans each record out to an ordered list
//! of sinks. Every sink has its own minimum level, so a file can capture
//! `debug` while the console only shows `warn`.

mod builder;

pub use builder::{FileBuilder, LoggerBuilder, TerminalBuilder};

use crate::internal;
use crate::level::Level;
use crate::output::{LogRecord, Output};
use std::panic::Location;

pub(crate) struct Sink {
    pub(crate) output: Box<dyn Output>,
    pub(crate) min_level: Level,
}

/// Immutable after build, so one instance can be shared across threads
/// (usually behind an `Arc`). Sinks serialize their own writes.
pub struct Logger {
    sinks: Vec<Sink>,
    level: Level,
    development: bool,
    /// Set for the internal logger, which has nowhere else to report to.
    pub(crate) quiet_errors: bool,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sinks.len())
            .field("min_level", &self.min_level())
            .field("development", &self.development)
            .finish()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Core dispatch. Writes the record to every sink whose minimum it meets,
    /// then applies the level's side effect: `Panic` panics, `DPanic` panics in
    /// development mode, `Fatal` flushes and exits with status 1.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str) {
        let caller = Location::caller();
        if self.enabled(level) {
            self.write(&LogRecord::new(level, msg).caller(caller));
        }
        self.finish(level, msg);
    }

    /// Like [`log`](Self::log) but only renders `args` when some sink wants the level.
    #[track_caller]
    pub fn log_fmt(&self, level: Level, args: std::fmt::Arguments<'_>) {
        let caller = Location::caller();
        if !self.enabled(level) && level < Level::DPanic {
            return;
        }
        let msg = std::fmt::format(args);
        if self.enabled(level) {
            self.write(&LogRecord::new(level, msg.as_str()).caller(caller));
        }
        self.finish(level, &msg);
    }

    /// Sends an already-built record to the sinks, without level side effects.
    pub fn write(&self, record: &LogRecord) {
        for sink in &self.sinks {
            if record.level < sink.min_level {
                continue;
            }
            if let Err(e) = sink.output.write(record)
                && !self.quiet_errors
            {
                internal::error("LOGGER", &format!("Failed to write log record: {e}"));
            }
        }
    }

    fn finish(&self, level: Level, msg: &str) {
        match level {
            Level::DPanic if self.development => panic!("{msg}"),
            Level::Panic => panic!("{msg}"),
            Level::Fatal => {
                let _ = self.flush();
                std::process::exit(1);
            }
            _ => {}
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg);
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    /// Logs at `DPanic`; panics afterwards only in development mode.
    #[track_caller]
    pub fn dpanic(&self, msg: &str) {
        self.log(Level::DPanic, msg);
    }

    /// Logs at `Panic`, then panics with the message.
    #[track_caller]
    pub fn panic(&self, msg: &str) -> ! {
        self.log(Level::Panic, msg);
        unreachable!("panic level always panics")
    }

    /// Logs at `Fatal`, flushes, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str) -> ! {
        self.log(Level::Fatal, msg);
        unreachable!("fatal level always exits")
    }

    /// Whether any sink accepts `level`.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| level >= sink.min_level)
    }

    /// Lowest level any sink accepts; the builder level when there are no sinks.
    #[must_use]
    pub fn min_level(&self) -> Level {
        self.sinks
            .iter()
            .map(|sink| sink.min_level)
            .min()
            .unwrap_or(self.level)
    }

    #[must_use]
    pub const fn is_development(&self) -> bool {
        self.development
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.sinks.len()
    }

    /// # Errors
    /// Returns the first I/O error encountered across all sinks.
    pub fn flush(&self) -> Result<(), crate::Error> {
        for sink in &self.sinks {
            sink.output.flush()?;
        }
        Ok(())
    }
}
