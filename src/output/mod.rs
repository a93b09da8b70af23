//! Sinks. A logger fans each record out to an ordered list of `Output`s, each
//! with its own encoder; custom backends only need to implement the trait.

mod encoder;
mod file;
mod terminal;

pub use encoder::{EncoderConfig, Encoding, LevelFormat};
pub use file::FileOutput;
pub use terminal::{Target, TerminalOutput};

use crate::level::Level;
use chrono::{DateTime, Local};
use std::panic::Location;

/// Everything a backend needs to render one log line.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub time: DateTime<Local>,
    /// Call site of the logging function, captured with `#[track_caller]`.
    pub caller: Option<&'static Location<'static>>,
}

impl LogRecord {
    /// Stamps the record with the current local time.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Local::now(),
            caller: None,
        }
    }

    #[must_use]
    pub const fn caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// `Send + Sync` so one logger can be shared across threads; implementations
/// serialize their own writes.
pub trait Output: Send + Sync {
    /// Encodes and writes one record.
    ///
    /// # Errors
    /// I/O errors from the underlying sink (stdout, rolling file).
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// Pushes buffered bytes to the sink.
    ///
    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), crate::Error>;
}
