//! Unified error type for all rotalog operations.

use std::path::PathBuf;

/// Error type for rotalog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Log path is empty or has no file name component.
    InvalidPath(String),
    /// The rotated-file pattern could not be turned into a matcher.
    InvalidPattern(regex::Error),
    /// A single write does not fit into one size-rolled file.
    WriteTooLarge {
        /// Path of the size-rolled file.
        path: PathBuf,
        /// Length of the rejected write.
        len: u64,
        /// Configured maximum file size in bytes.
        max: u64,
    },
    /// Format/serialization error.
    Format(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::InvalidPath(s) => write!(f, "invalid path: {s}"),
            Self::InvalidPattern(e) => write!(f, "invalid rotation pattern: {e}"),
            Self::WriteTooLarge { path, len, max } => write!(
                f,
                "write length {len} exceeds maximum file size {max} for {}",
                path.display()
            ),
            Self::Format(s) => write!(f, "format error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            Self::InvalidPattern(e) => Some(e),
            Self::InvalidPath(_) | Self::WriteTooLarge { .. } | Self::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Self::InvalidPattern(e)
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(io) => io,
            other => Self::other(other),
        }
    }
}
