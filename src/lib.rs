//! `rotalog` - process-wide logging facade with rotating log files.
//!
//! - Composable [`Logger`]: an ordered set of sinks, each with its own encoder
//!   and minimum level
//! - Rotation by size (timestamped, gzipped backups) or by date (one file per day)
//! - A global slot filled by [`init`] or, lazily, by a console default whose
//!   level follows the `DEBUG` environment variable
//!
//! # Example
//!
//! ```no_run
//! use rotalog::{LoggerConfig, RotationMode};
//!
//! rotalog::init(
//!     &LoggerConfig::new("logs/app.log")
//!         .level("debug")
//!         .rotation(RotationMode::ByDate)
//!         .max_backups(7)
//!         .stdout(true),
//! );
//!
//! rotalog::infof!("listening on {}", 8080);
//! rotalog::warn!("retries left: ", 3);
//! ```
//!
//! Without `init`, the first logging call installs the console default:
//!
//! ```
//! rotalog::info!("hello ", "world");
//! assert!(rotalog::is_initialized());
//! ```

pub mod config;
pub mod error;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;
pub mod rolling;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{LoggerConfig, RotationMode};
pub use error::Error;
pub use global::{
    date_rolling, default, init, install, is_initialized, logger, size_rolling, try_date_rolling,
    try_init, try_size_rolling,
};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use output::{EncoderConfig, Encoding, FileOutput, LogRecord, Output, TerminalOutput};
pub use rolling::{DateRollingWriter, Retention, SizeRollingWriter};
pub use value::Value;

/// Builds the operand list for the unformatted logging functions.
#[doc(hidden)]
#[macro_export]
macro_rules! __values {
    ($($arg:expr),* $(,)?) => {
        &[$($crate::Value::from($arg)),*]
    };
}

/// Logs operands at `debug`; see [`value::concat`] for how they are joined.
#[macro_export]
macro_rules! debug {
    ($($arg:expr),* $(,)?) => {
        $crate::global::debug($crate::__values!($($arg),*))
    };
}

/// Logs operands at `info`.
#[macro_export]
macro_rules! info {
    ($($arg:expr),* $(,)?) => {
        $crate::global::info($crate::__values!($($arg),*))
    };
}

/// Logs operands at `warn`.
#[macro_export]
macro_rules! warn {
    ($($arg:expr),* $(,)?) => {
        $crate::global::warn($crate::__values!($($arg),*))
    };
}

/// Logs operands at `error`.
#[macro_export]
macro_rules! error {
    ($($arg:expr),* $(,)?) => {
        $crate::global::error($crate::__values!($($arg),*))
    };
}

/// Logs operands at `fatal`, then exits the process.
#[macro_export]
macro_rules! fatal {
    ($($arg:expr),* $(,)?) => {
        $crate::global::fatal($crate::__values!($($arg),*))
    };
}

/// Logs a `format!`-style message at `debug`.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::global::debugf(format_args!($($arg)+))
    };
}

/// Logs a `format!`-style message at `info`.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::global::infof(format_args!($($arg)+))
    };
}

/// Logs a `format!`-style message at `warn`.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::global::warnf(format_args!($($arg)+))
    };
}

/// Logs a `format!`-style message at `error`.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::global::errorf(format_args!($($arg)+))
    };
}

/// Logs a `format!`-style message at `fatal`, then exits the process.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::global::fatalf(format_args!($($arg)+))
    };
}
