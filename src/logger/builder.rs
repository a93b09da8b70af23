//! Stepwise construction of a `Logger`. Sub-builders configure one sink each
//! and hand control back to the parent with `done()`.

use super::{Logger, Sink};
use crate::level::Level;
use crate::output::{EncoderConfig, FileOutput, Output, Target, TerminalOutput};
use std::io::Write;

struct PendingSink {
    output: Box<dyn Output>,
    /// `None` falls back to the builder level at `build()`.
    min_level: Option<Level>,
}

pub struct LoggerBuilder {
    level: Level,
    development: bool,
    sinks: Vec<PendingSink>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Info is the default; debug is opt-in.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            development: false,
            sinks: Vec::new(),
        }
    }

    /// Minimum level for every sink that doesn't set its own.
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// In development mode `DPanic` records panic after being written.
    #[must_use]
    pub const fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    #[must_use]
    pub fn terminal(self) -> TerminalBuilder {
        TerminalBuilder {
            parent: self,
            output: TerminalOutput::new(),
            level: None,
        }
    }

    /// File sink over `writer`, typically a `SizeRollingWriter` or `DateRollingWriter`.
    #[must_use]
    pub fn file(self, writer: impl Write + Send + 'static) -> FileBuilder {
        FileBuilder {
            parent: self,
            output: FileOutput::new(writer),
            level: None,
        }
    }

    /// Custom backend at the builder level.
    #[must_use]
    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.sinks.push(PendingSink {
            output: Box::new(output),
            min_level: None,
        });
        self
    }

    /// Custom backend with its own minimum level.
    #[must_use]
    pub fn output_at(mut self, output: impl Output + 'static, level: Level) -> Self {
        self.sinks.push(PendingSink {
            output: Box::new(output),
            min_level: Some(level),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        let level = self.level;
        Logger {
            sinks: self
                .sinks
                .into_iter()
                .map(|sink| Sink {
                    output: sink.output,
                    min_level: sink.min_level.unwrap_or(level),
                })
                .collect(),
            level,
            development: self.development,
            quiet_errors: false,
        }
    }
}

pub struct TerminalBuilder {
    parent: LoggerBuilder,
    output: TerminalOutput,
    level: Option<Level>,
}

impl TerminalBuilder {
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.output = self.output.encoder(encoder);
        self
    }

    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.output = self.output.target(target);
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.sinks.push(PendingSink {
            output: Box::new(self.output),
            min_level: self.level,
        });
        self.parent
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    output: FileOutput,
    level: Option<Level>,
}

impl FileBuilder {
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.output = self.output.encoder(encoder);
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.sinks.push(PendingSink {
            output: Box::new(self.output),
            min_level: self.level,
        });
        self.parent
    }
}
