//! Rotating file writers.
//!
//! Two conventions are supported:
//! - **by date**: the active file name carries the day (`app.20240309.log`),
//!   a new file starts when the day changes, and old days are purged by count
//!   or by age. The configured path is kept as a symlink to the active file.
//! - **by size**: the configured path is the active file; once it would grow
//!   past the limit it is renamed to a timestamped backup, gzip-compressed, and
//!   old backups are dropped by count and age.

mod backups;
mod compress;
mod date;
mod size;

pub use date::DateRollingWriter;
pub use size::SizeRollingWriter;

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// strftime suffix inserted before the extension of date-rolled files.
pub const DATE_SUFFIX: &str = ".%Y%m%d";

/// Source of "now" for rotation decisions. Tests substitute a fixed clock.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub(crate) fn system_clock() -> Clock {
    Box::new(Local::now)
}

/// Age limit used by [`Retention::select`] when the selected limit is zero.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;

/// Which archived files survive a purge. Exactly one policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Delete files last modified more than `days` ago. Zero disables purging
    /// when constructed directly.
    MaxAge { days: u32 },
    /// Keep the newest `n` files. Zero disables purging when constructed directly.
    Count(u32),
}

impl Retention {
    /// A backup count larger than the age limit means the age limit is the
    /// tighter bound, so age wins; otherwise the count does. A selected limit
    /// of zero falls back to a [`DEFAULT_MAX_AGE_DAYS`] age purge.
    #[must_use]
    pub const fn select(max_backups: u32, max_age_days: u32) -> Self {
        let fallback = Self::MaxAge {
            days: DEFAULT_MAX_AGE_DAYS,
        };
        if max_backups > max_age_days {
            if max_age_days == 0 {
                fallback
            } else {
                Self::MaxAge { days: max_age_days }
            }
        } else if max_backups == 0 {
            fallback
        } else {
            Self::Count(max_backups)
        }
    }
}

/// Inserts [`DATE_SUFFIX`] before the file extension, or appends it when there is none.
/// A dotfile's whole name counts as its extension.
///
/// ```
/// use rotalog::rolling::date_pattern;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(date_pattern(Path::new("app.log")), PathBuf::from("app.%Y%m%d.log"));
/// assert_eq!(date_pattern(Path::new("app")), PathBuf::from("app.%Y%m%d"));
/// assert_eq!(date_pattern(Path::new(".app")), PathBuf::from(".%Y%m%d.app"));
/// ```
#[must_use]
pub fn date_pattern(path: &Path) -> PathBuf {
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            let mut name = OsString::from(stem);
            name.push(DATE_SUFFIX);
            name.push(".");
            name.push(ext);
            path.with_file_name(name)
        }
        (Some(stem), None) if stem.as_encoded_bytes().starts_with(b".") => {
            let mut name = OsString::from(DATE_SUFFIX);
            name.push(stem);
            path.with_file_name(name)
        }
        _ => {
            let mut raw = path.as_os_str().to_owned();
            raw.push(DATE_SUFFIX);
            PathBuf::from(raw)
        }
    }
}
