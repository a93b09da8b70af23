//! Severity levels that gate which records reach which sinks.

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so each sink can compare a record's level against its own minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Verbose diagnostics, usually only enabled through the `DEBUG` variable.
    Debug = 0,
    /// Normal operational milestones.
    #[default]
    Info = 1,
    /// Non-fatal anomalies that may need attention.
    Warn = 2,
    /// Failures that prevented an operation from completing.
    Error = 3,
    /// Panics only when the logger runs in development mode.
    DPanic = 4,
    /// Emits the record, then panics.
    Panic = 5,
    /// Emits the record, then terminates the process.
    Fatal = 6,
}

impl Level {
    /// Lowercase because config files and CLI args use lowercase level strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::DPanic => "dpanic",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Encoders print capitalized levels.
    #[must_use]
    pub const fn as_capital(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::DPanic => "DPANIC",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }

    /// Used by help output and tests.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Debug,
            Self::Info,
            Self::Warn,
            Self::Error,
            Self::DPanic,
            Self::Panic,
            Self::Fatal,
        ]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can tell an unknown level apart from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl ParseLevelError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Case-insensitive. The empty string is `Info` so an unset config value stays useful.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" | "" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "DPANIC" => Ok(Self::DPanic),
            "PANIC" => Ok(Self::Panic),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Lenient parse used by the facade entry points.
///
/// The logger is not configured yet when this runs, so an unknown level is
/// reported straight to stdout and replaced with `Info`.
#[must_use]
pub fn parse_or_info(s: &str) -> Level {
    s.parse().unwrap_or_else(|err: ParseLevelError| {
        println!("invalid log level {}, change to INFO", err.input());
        Level::Info
    })
}
