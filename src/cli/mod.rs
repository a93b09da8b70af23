//! `rotalog` command line: pipe a process's output, or a single message, into
//! a rotating log file.

use crate::config::{LoggerConfig, RotationMode};
use crate::global;
use crate::internal;
use crate::level::Level;
use crate::logger::Logger;
use crate::output::Encoding;
use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

/// Levels a CLI record may be emitted at. The terminating levels are left out
/// on purpose: a log pipe should not exit or panic on one line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Rolling {
    Size,
    Date,
}

impl From<Rolling> for RotationMode {
    fn from(rolling: Rolling) -> Self {
        match rolling {
            Rolling::Size => Self::BySize,
            Rolling::Date => Self::ByDate,
        }
    }
}

/// Write log lines into a rotating log file.
///
/// Without --file or --config, records go to stdout through the default
/// console logger.
#[derive(Debug, Parser)]
#[command(name = "rotalog", version, about = "Write log lines into a rotating log file")]
pub struct Cli {
    /// Log file path
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,
    /// TOML logger config; --file overrides its path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Minimum level written (debug, info, warn, error, dpanic, panic, fatal)
    #[arg(short, long, default_value = "info")]
    pub level: String,
    /// Rotation mode
    #[arg(long, value_enum, default_value = "size")]
    pub rolling: Rolling,
    /// Size mode: rotate past this many megabytes
    #[arg(long, value_name = "MB", default_value_t = 100)]
    pub max_size: u64,
    /// Backups to keep
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub max_backups: u32,
    /// Days to keep backups
    #[arg(long, value_name = "DAYS", default_value_t = 0)]
    pub max_age: u32,
    /// Mirror records to stdout
    #[arg(long)]
    pub stdout: bool,
    /// Write JSON lines instead of tab-separated text
    #[arg(long)]
    pub json: bool,
    /// Level of the emitted records
    #[arg(short = 'a', long = "at", value_enum, default_value = "info")]
    pub at: LogLevel,
    /// Message to log; reads stdin line by line when omitted
    pub message: Vec<String>,
}

impl Cli {
    /// Logger config from the flags, or `None` when no file was requested.
    ///
    /// # Errors
    /// Returns the config loading error for an unreadable or malformed --config.
    pub fn logger_config(&self) -> Result<Option<LoggerConfig>, crate::Error> {
        let mut config = match (&self.config, &self.file) {
            (Some(path), _) => LoggerConfig::load(path)?,
            (None, Some(_)) => LoggerConfig::default()
                .level(self.level.clone())
                .rotation(self.rolling.into())
                .max_size_mb(self.max_size)
                .max_backups(self.max_backups)
                .max_age_days(self.max_age),
            (None, None) => return Ok(None),
        };
        if let Some(file) = &self.file {
            config.file_path.clone_from(file);
        }
        if self.json {
            config = config.encoding(Encoding::Json);
        }
        if self.stdout {
            config = config.stdout(true);
        }
        Ok(Some(config))
    }
}

/// Runs the parsed command line.
#[must_use]
pub fn run(cli: &Cli) -> ExitCode {
    let logger = match cli.logger_config() {
        Ok(Some(config)) => match global::try_init(&config) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("rotalog: {e}");
                return ExitCode::FAILURE;
            }
        },
        Ok(None) => global::logger(),
        Err(e) => {
            eprintln!("rotalog: {e}");
            return ExitCode::FAILURE;
        }
    };

    let level = Level::from(cli.at);
    let status = if cli.message.is_empty() {
        match pipe_lines(io::stdin().lock(), &logger, level) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                internal::error("CLI", &format!("Failed to read stdin: {e}"));
                ExitCode::FAILURE
            }
        }
    } else {
        logger.log(level, &cli.message.join(" "));
        ExitCode::SUCCESS
    };

    if let Err(e) = logger.flush() {
        internal::error("CLI", &format!("Flush failed: {e}"));
        return ExitCode::FAILURE;
    }
    status
}

/// Logs every line of `input` at `level`, skipping blank lines. Returns the
/// number of records written.
///
/// # Errors
/// Read errors from `input`.
pub fn pipe_lines(input: impl BufRead, logger: &Logger, level: Level) -> io::Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        logger.log(level, &line);
        count += 1;
    }
    Ok(count)
}
