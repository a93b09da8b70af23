use super::backups::{self, LogFile};
use super::{Clock, Retention, date_pattern, system_clock};
use crate::internal;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeDelta};
use regex::Regex;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes to a file named after the current day and starts a new one when the
/// day changes.
///
/// For a configured path `logs/app.log` the active file is
/// `logs/app.20240309.log` and `logs/app.log` is a symlink to it (unix only).
/// Every time a new file is opened, files matching `app.*.log` are purged
/// according to the [`Retention`] policy.
pub struct DateRollingWriter {
    dir: PathBuf,
    /// strftime pattern for the file name only; `%` from the path itself is escaped.
    pattern: String,
    matcher: Regex,
    link: Option<PathBuf>,
    retention: Retention,
    clock: Clock,
    current: Option<(PathBuf, File)>,
}

impl fmt::Debug for DateRollingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRollingWriter")
            .field("dir", &self.dir)
            .field("pattern", &self.pattern)
            .field("link", &self.link)
            .field("retention", &self.retention)
            .field("current", &self.current.as_ref().map(|(path, _)| path))
            .finish_non_exhaustive()
    }
}

impl DateRollingWriter {
    /// Prepares a writer for `path`. No file is opened until the first write.
    ///
    /// # Errors
    /// Returns `Error::InvalidPath` when `path` has no file name, or
    /// `Error::InvalidPattern` when the derived pattern can't be matched.
    pub fn new(path: impl AsRef<Path>, retention: Retention) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let Some(file_name) = path.file_name() else {
            return Err(crate::Error::InvalidPath(path.display().to_string()));
        };
        let file_name = file_name
            .to_str()
            .ok_or_else(|| crate::Error::InvalidPath(path.display().to_string()))?;

        let escaped = file_name.replace('%', "%%");
        let pattern = date_pattern(Path::new(&escaped)).to_string_lossy().into_owned();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(crate::Error::Format(format!(
                "unsupported rotation pattern: {pattern}"
            )));
        }
        let matcher = backups::strftime_matcher(&pattern)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        internal::debug(
            "ROLL",
            &format!("Date rolling {} with {retention:?}", dir.join(&pattern).display()),
        );

        Ok(Self {
            dir,
            pattern,
            matcher,
            link: Some(path.to_path_buf()),
            retention,
            clock: system_clock(),
            current: None,
        })
    }

    /// Replaces the time source used to name files and age them.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Disables the symlink at the configured path.
    #[must_use]
    pub fn without_link(mut self) -> Self {
        self.link = None;
        self
    }

    /// Opens today's file now instead of on the first write, so an unusable
    /// path surfaces at setup time.
    ///
    /// # Errors
    /// I/O errors from creating directories or opening the file.
    pub fn open(&mut self) -> Result<(), crate::Error> {
        self.active_file().map(|_| ())
    }

    /// Path of the file currently written to, if one is open.
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|(path, _)| path.as_path())
    }

    /// Path the next write would go to.
    #[must_use]
    pub fn path_for(&self, now: DateTime<Local>) -> PathBuf {
        self.dir.join(now.format(&self.pattern).to_string())
    }

    fn active_file(&mut self) -> Result<&mut File, crate::Error> {
        let now = (self.clock)();
        let wanted = self.path_for(now);

        let stale = self
            .current
            .as_ref()
            .is_none_or(|(path, _)| *path != wanted);
        if stale {
            fs::create_dir_all(&self.dir)?;
            let file = OpenOptions::new().create(true).append(true).open(&wanted)?;
            internal::debug("ROLL", &format!("Switched to {}", wanted.display()));
            self.current = Some((wanted.clone(), file));
            self.update_link(&wanted);
            self.purge(now, &wanted);
        }

        match self.current.as_mut() {
            Some((_, file)) => Ok(file),
            None => Err(io::Error::other("no active log file").into()),
        }
    }

    #[cfg(unix)]
    fn update_link(&self, target: &Path) {
        let Some(link) = &self.link else {
            return;
        };
        if let Ok(meta) = fs::symlink_metadata(link)
            && !meta.file_type().is_symlink()
        {
            internal::warn(
                "ROLL",
                &format!("{} exists and is not a symlink, not linking", link.display()),
            );
            return;
        }

        // Link by file name; both live in the same directory.
        let Some(name) = target.file_name() else {
            return;
        };
        let mut tmp = link.as_os_str().to_owned();
        tmp.push("_symlink");
        let tmp = PathBuf::from(tmp);
        let _ = fs::remove_file(&tmp);

        let result = std::os::unix::fs::symlink(name, &tmp).and_then(|()| fs::rename(&tmp, link));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            internal::warn(
                "ROLL",
                &format!("Failed to link {} -> {}: {e}", link.display(), target.display()),
            );
        }
    }

    #[cfg(not(unix))]
    fn update_link(&self, _target: &Path) {}

    fn purge(&self, now: DateTime<Local>, active: &Path) {
        let files = match backups::collect(&self.dir, &self.matcher) {
            Ok(files) => files,
            Err(e) => {
                internal::warn("ROLL", &format!("Failed to scan for old logs: {e}"));
                return;
            }
        };
        let mut files: Vec<LogFile> = files.into_iter().filter(|f| f.path != active).collect();

        match self.retention {
            Retention::MaxAge { days } if days > 0 => {
                let cutoff = now - TimeDelta::days(i64::from(days));
                backups::remove_all(
                    files
                        .iter()
                        .filter(|f| DateTime::<Local>::from(f.modified) < cutoff),
                );
            }
            Retention::Count(keep) if keep > 0 => {
                // The active file is one of the `keep`.
                files.sort_by(|a, b| b.modified.cmp(&a.modified));
                let keep = usize::try_from(keep).unwrap_or(usize::MAX);
                backups::remove_all(files.iter().skip(keep.saturating_sub(1)));
            }
            Retention::MaxAge { .. } | Retention::Count(_) => {}
        }
    }
}

impl Write for DateRollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self.active_file()?;
        file.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let file = self.active_file()?;
        file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}
