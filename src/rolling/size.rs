use super::backups::{self, LogFile};
use super::compress::compress_file;
use super::{Clock, system_clock};
use crate::internal;
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MEGABYTE: u64 = 1024 * 1024;
/// Used when the configured limit is zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Writes to a fixed path and moves it aside once it would exceed `max_size`.
///
/// Backups are named `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm>.<ext>` next to the
/// active file. After every rotation the backups are compressed (optional),
/// trimmed to `max_backups` (0 keeps all) and to `max_age_days` (0 keeps all).
pub struct SizeRollingWriter {
    path: PathBuf,
    max_size: u64,
    max_backups: u32,
    max_age_days: u32,
    compress: bool,
    local_time: bool,
    backup_matcher: Regex,
    clock: Clock,
    file: Option<File>,
    size: u64,
}

impl fmt::Debug for SizeRollingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeRollingWriter")
            .field("path", &self.path)
            .field("max_size", &self.max_size)
            .field("max_backups", &self.max_backups)
            .field("max_age_days", &self.max_age_days)
            .field("compress", &self.compress)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl SizeRollingWriter {
    /// Prepares a writer with a 100 MB limit, no retention limits, compression
    /// on and local-time backup names. No file is opened until the first write.
    ///
    /// # Errors
    /// Returns `Error::InvalidPath` when `path` has no UTF-8 file name.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, crate::Error> {
        let path = path.into();
        let (stem, ext) = split_name(&path)?;
        let backup_matcher = Regex::new(&format!(
            r"^{}-(\d{{4}}-\d{{2}}-\d{{2}}T\d{{2}}-\d{{2}}-\d{{2}}\.\d{{3}}){}(\.gz)?$",
            regex::escape(&stem),
            regex::escape(&ext)
        ))?;

        Ok(Self {
            path,
            max_size: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age_days: 0,
            compress: true,
            local_time: true,
            backup_matcher,
            clock: system_clock(),
            file: None,
            size: 0,
        })
    }

    /// Limit in megabytes; zero means the 100 MB default.
    #[must_use]
    pub const fn max_size_mb(mut self, mb: u64) -> Self {
        let mb = if mb == 0 { DEFAULT_MAX_SIZE_MB } else { mb };
        self.max_size = mb.saturating_mul(MEGABYTE);
        self
    }

    /// Limit in bytes, for tests and callers that need sub-megabyte files.
    #[must_use]
    pub const fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
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
    pub const fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Backup names use local time when true, UTC otherwise.
    #[must_use]
    pub const fn local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    /// Replaces the time source used for backup names and age checks.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens (or creates) the log file now instead of on the first write, so
    /// an unusable path surfaces at setup time.
    ///
    /// # Errors
    /// I/O errors from creating directories or opening the file.
    pub fn open(&mut self) -> Result<(), crate::Error> {
        if self.file.is_none() {
            self.open_existing_or_new(0)?;
        }
        Ok(())
    }

    /// Closes the active file, moves it to a backup and starts a new one.
    ///
    /// # Errors
    /// I/O errors from renaming the old file or creating the new one.
    pub fn rotate(&mut self) -> Result<(), crate::Error> {
        self.file = None;
        self.open_new()?;
        self.mill();
        Ok(())
    }

    fn now_naive(&self) -> NaiveDateTime {
        let now = (self.clock)();
        if self.local_time {
            now.naive_local()
        } else {
            now.naive_utc()
        }
    }

    fn backup_path(&self) -> Result<PathBuf, crate::Error> {
        let (stem, ext) = split_name(&self.path)?;
        let mut time = self.now_naive();
        loop {
            let stamp = time.format(BACKUP_TIME_FORMAT);
            let candidate = self.path.with_file_name(format!("{stem}-{stamp}{ext}"));
            let gz = self.path.with_file_name(format!("{stem}-{stamp}{ext}.gz"));
            // Rotations within the same millisecond must not overwrite each other.
            if !candidate.exists() && !gz.exists() {
                return Ok(candidate);
            }
            time += TimeDelta::milliseconds(1);
        }
    }

    fn open_new(&mut self) -> Result<(), crate::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if self.path.exists() {
            let backup = self.backup_path()?;
            fs::rename(&self.path, &backup)?;
            internal::debug("ROLL", &format!("Rotated to {}", backup.display()));
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    /// Appends to an existing file when the next write fits, otherwise rotates.
    fn open_existing_or_new(&mut self, write_len: u64) -> Result<(), crate::Error> {
        self.mill();

        let Ok(meta) = fs::metadata(&self.path) else {
            return self.open_new();
        };
        if meta.len() + write_len >= self.max_size {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.size = meta.len();
                Ok(())
            }
            // Unreadable or locked file: start over instead of failing every write.
            Err(_) => self.open_new(),
        }
    }

    /// Post-rotation housekeeping. Failures are reported, never returned, so a
    /// full disk or a permission problem on an old backup doesn't block logging.
    fn mill(&self) {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut files = match backups::collect(dir, &self.backup_matcher) {
            Ok(files) => files,
            Err(e) => {
                internal::warn("ROLL", &format!("Failed to scan backups: {e}"));
                return;
            }
        };

        // Newest first by the timestamp embedded in the name.
        files.sort_by_cached_key(|f| std::cmp::Reverse(self.backup_time(f)));

        let mut doomed: Vec<LogFile> = Vec::new();
        if self.max_backups > 0 {
            let keep = usize::try_from(self.max_backups).unwrap_or(usize::MAX);
            if files.len() > keep {
                doomed.extend(files.split_off(keep));
            }
        }
        if self.max_age_days > 0 {
            let cutoff = self.now_naive() - TimeDelta::days(i64::from(self.max_age_days));
            let (old, fresh): (Vec<_>, Vec<_>) = files
                .into_iter()
                .partition(|f| self.backup_time(f).is_some_and(|t| t < cutoff));
            doomed.extend(old);
            files = fresh;
        }
        backups::remove_all(&doomed);

        if self.compress {
            for file in files.iter().filter(|f| !f.name.ends_with(".gz")) {
                match compress_file(&file.path) {
                    Ok((gz, saved)) => internal::debug(
                        "ROLL",
                        &format!("Compressed {} ({saved} bytes saved)", gz.display()),
                    ),
                    Err(e) => internal::warn(
                        "ROLL",
                        &format!("Failed to compress {}: {e}", file.path.display()),
                    ),
                }
            }
        }
    }

    fn backup_time(&self, file: &LogFile) -> Option<NaiveDateTime> {
        let caps = self.backup_matcher.captures(&file.name)?;
        NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), BACKUP_TIME_FORMAT).ok()
    }
}

impl Write for SizeRollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.max_size {
            return Err(crate::Error::WriteTooLarge {
                path: self.path.clone(),
                len,
                max: self.max_size,
            }
            .into());
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        }
        if self.size + len > self.max_size {
            self.rotate()?;
        }

        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::other("no active log file"));
        };
        let n = file.write(buf)?;
        self.size += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// `app.log` -> (`app`, `.log`); `app` -> (`app`, ``).
fn split_name(path: &Path) -> Result<(String, String), crate::Error> {
    let invalid = || crate::Error::InvalidPath(path.display().to_string());
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    let ext = name.strip_prefix(stem).unwrap_or_default();
    Ok((stem.to_string(), ext.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_keeps_dot_on_extension() {
        assert_eq!(
            split_name(Path::new("/tmp/app.log")).unwrap(),
            ("app".to_string(), ".log".to_string())
        );
        assert_eq!(
            split_name(Path::new("app")).unwrap(),
            ("app".to_string(), String::new())
        );
    }

    #[test]
    fn zero_size_means_default() {
        let writer = SizeRollingWriter::new("app.log").unwrap().max_size_mb(0);
        assert_eq!(writer.max_size, DEFAULT_MAX_SIZE_MB * MEGABYTE);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(SizeRollingWriter::new("").is_err());
    }
}
