//! Console sink. The facade mirrors to stdout; rotalog's own diagnostics use stderr.

use super::{EncoderConfig, LogRecord, Output};
use std::io::{self, Write};

/// Which standard stream a `TerminalOutput` writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Default)]
pub struct TerminalOutput {
    encoder: EncoderConfig,
    target: Target,
}

impl TerminalOutput {
    /// Development encoder on stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            encoder: EncoderConfig::development(),
            target: Target::Stdout,
        }
    }

    #[must_use]
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub const fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

impl Output for TerminalOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        let line = self.encoder.encode(record)?;
        // The stream lock keeps lines from concurrent threads from interleaving.
        match self.target {
            Target::Stdout => writeln!(io::stdout().lock(), "{line}")?,
            Target::Stderr => writeln!(io::stderr().lock(), "{line}")?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        match self.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}
