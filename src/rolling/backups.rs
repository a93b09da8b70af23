//! Archived-file discovery shared by both writers. Metadata is captured at scan
//! time so the purge decisions work from one consistent snapshot.

use crate::internal;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A rotated file found next to the active log.
#[derive(Debug, Clone)]
pub(super) struct LogFile {
    pub path: PathBuf,
    pub name: String,
    pub modified: SystemTime,
}

/// Lists regular files in `dir` whose name matches `matcher`. Symlinks are
/// skipped so the date writer's link never counts as an archive.
pub(super) fn collect(dir: &Path, matcher: &Regex) -> Result<Vec<LogFile>, crate::Error> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
            continue;
        };
        if !matcher.is_match(&name) {
            continue;
        }
        let Ok(meta) = fs::symlink_metadata(entry.path()) else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        files.push(LogFile {
            path: entry.path(),
            name,
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    internal::debug(
        "ROLL",
        &format!("Found {} rotated files in {}", files.len(), dir.display()),
    );
    Ok(files)
}

/// Deletes each file, reporting failures instead of aborting the pass.
pub(super) fn remove_all<'a>(files: impl IntoIterator<Item = &'a LogFile>) {
    for file in files {
        match fs::remove_file(&file.path) {
            Ok(()) => internal::debug("ROLL", &format!("Removed {}", file.path.display())),
            Err(e) => internal::warn(
                "ROLL",
                &format!("Failed to remove {}: {e}", file.path.display()),
            ),
        }
    }
}

/// Literal-safe regex for a file name where every strftime specifier is a wildcard.
pub(super) fn strftime_matcher(pattern: &str) -> Result<Regex, crate::Error> {
    let mut re = String::from("^");
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => literal.push('%'),
            Some(_) => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                re.push_str(".+?");
            }
            None => literal.push('%'),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');

    Ok(Regex::new(&re)?)
}
