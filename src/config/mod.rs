//! Logger configuration: the parameters of the facade's `init`, loadable from
//! TOML, and buildable into a `Logger` without touching global state.
//!
//! ```toml
//! file_path = "~/logs/app.log"
//! level = "debug"
//! rotation = "date"
//! max_backups = 7
//! max_age_days = 30
//! stdout = true
//! ```

use crate::internal;
use crate::level::{self, Level};
use crate::logger::Logger;
use crate::output::{EncoderConfig, Encoding};
use crate::rolling::{DateRollingWriter, Retention, SizeRollingWriter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// When the active log file is closed and archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationMode {
    /// Rotate when the file would exceed `max_size_mb`.
    #[default]
    #[serde(rename = "size", alias = "by_size")]
    BySize,
    /// Rotate when the day changes.
    #[serde(rename = "date", alias = "by_date")]
    ByDate,
}

/// An empty file still yields a usable config: every field has a default.
///
/// Which of `max_size_mb`, `max_backups` and `max_age_days` matter depends on
/// `rotation`; the others are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub file_path: String,
    /// Level name, parsed leniently (unknown names become `info`).
    pub level: String,
    pub rotation: RotationMode,
    /// Size mode only. Zero means 100.
    pub max_size_mb: u64,
    /// Size mode: backups to keep (0 keeps all). Date mode: see [`Retention::select`].
    pub max_backups: u32,
    /// Size mode: days to keep backups (0 keeps all). Date mode: see [`Retention::select`].
    pub max_age_days: u32,
    /// Mirror records to stdout with the development encoder.
    pub stdout: bool,
    /// Size mode only: gzip rotated backups.
    pub compress: bool,
    /// Size mode only: local time in backup names, UTC otherwise.
    pub local_time: bool,
    /// Line layout of the file sink.
    pub encoding: Encoding,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            level: "info".to_string(),
            rotation: RotationMode::BySize,
            max_size_mb: 100,
            max_backups: 0,
            max_age_days: 0,
            stdout: false,
            compress: true,
            local_time: true,
            encoding: Encoding::Console,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub const fn rotation(mut self, mode: RotationMode) -> Self {
        self.rotation = mode;
        self
    }

    #[must_use]
    pub const fn max_size_mb(mut self, mb: u64) -> Self {
        self.max_size_mb = mb;
        self
    }

    #[must_use]
    pub const fn max_backups(mut self, n: u32) -> Self {
        self.max_backups = n;
        self
    }

    #[must_use]
    pub const fn max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use]
    pub const fn stdout(mut self, enabled: bool) -> Self {
        self.stdout = enabled;
        self
    }

    #[must_use]
    pub const fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub const fn local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    #[must_use]
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// # Errors
    /// Returns `Error::ConfigParse` on malformed TOML or unknown enum values.
    pub fn from_toml_str(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    /// Returns `Error::Io` if the file can't be read, `Error::ConfigParse` if it isn't valid TOML.
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        internal::debug(
            "CONFIG",
            &format!("Config loaded from {}", path.display()),
        );
        Ok(config)
    }

    /// Lenient level: unknown names print a warning to stdout and become `Info`.
    #[must_use]
    pub fn parsed_level(&self) -> Level {
        level::parse_or_info(&self.level)
    }

    /// `file_path` with `~` and `$VAR` expanded.
    ///
    /// # Errors
    /// Returns `Error::InvalidPath` for an empty path or an undefined variable.
    pub fn resolved_path(&self) -> Result<PathBuf, crate::Error> {
        if self.file_path.trim().is_empty() {
            return Err(crate::Error::InvalidPath("log file path is empty".to_string()));
        }
        let expanded = shellexpand::full(&self.file_path)
            .map_err(|e| crate::Error::InvalidPath(format!("{}: {e}", self.file_path)))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// The rotating writer selected by `rotation`, already opened.
    ///
    /// # Errors
    /// Path, pattern and I/O errors from setting up the writer.
    pub fn writer(&self) -> Result<Box<dyn Write + Send>, crate::Error> {
        let path = self.resolved_path()?;
        match self.rotation {
            RotationMode::BySize => {
                let mut writer = SizeRollingWriter::new(path)?
                    .max_size_mb(self.max_size_mb)
                    .max_backups(self.max_backups)
                    .max_age_days(self.max_age_days)
                    .compress(self.compress)
                    .local_time(self.local_time);
                writer.open()?;
                Ok(Box::new(writer))
            }
            RotationMode::ByDate => {
                let retention = Retention::select(self.max_backups, self.max_age_days);
                let mut writer = DateRollingWriter::new(path, retention)?;
                writer.open()?;
                Ok(Box::new(writer))
            }
        }
    }

    /// Builds a logger with a file sink and, if `stdout`, a console mirror,
    /// both at the configured level.
    ///
    /// # Errors
    /// Any error from [`writer`](Self::writer).
    pub fn build(&self) -> Result<Logger, crate::Error> {
        let level = self.parsed_level();
        let mut builder = Logger::builder()
            .level(level)
            .file(self.writer()?)
            .encoder(EncoderConfig::production().encoding(self.encoding))
            .done();
        if self.stdout {
            builder = builder
                .terminal()
                .encoder(EncoderConfig::development())
                .done();
        }
        Ok(builder.build())
    }
}
