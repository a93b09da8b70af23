//! Turns a `LogRecord` into one line of text.
//!
//! Console encoding is tab-separated (`time  LEVEL  caller  message`), which
//! keeps files greppable and `cut -f`-able. JSON encoding writes one object per
//! line for log shippers.

use super::LogRecord;
use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::panic::Location;

/// RFC 3339 with a numeric offset.
pub const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// How the level column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFormat {
    /// `INFO`, `WARN`, ...
    #[default]
    Capital,
    /// Capital level wrapped in an ANSI color.
    CapitalColor,
    /// `info`, `warn`, ...
    Lowercase,
}

impl LevelFormat {
    fn render(self, level: Level) -> String {
        match self {
            Self::Capital => level.as_capital().to_string(),
            Self::Lowercase => level.as_str().to_string(),
            Self::CapitalColor => {
                let code = match level {
                    Level::Debug => "35",
                    Level::Info => "34",
                    Level::Warn => "33",
                    Level::Error | Level::DPanic | Level::Panic | Level::Fatal => "31",
                };
                format!("\x1b[{code}m{}\x1b[0m", level.as_capital())
            }
        }
    }
}

/// Line layout of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Console,
    Json,
}

/// Per-sink encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// strftime pattern for the timestamp column.
    pub time_format: String,
    pub level_format: LevelFormat,
    pub encoding: Encoding,
    /// Include the `file:line` of the call site.
    pub caller: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    level: &'a str,
    ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    msg: &'a str,
}

impl EncoderConfig {
    /// Settings for file sinks.
    #[must_use]
    pub fn production() -> Self {
        Self {
            time_format: RFC3339.to_string(),
            level_format: LevelFormat::Capital,
            encoding: Encoding::Console,
            caller: true,
        }
    }

    /// Settings for the console mirror and the lazily created default logger.
    /// Same columns as the file sink so mirrored lines match the file byte for byte.
    #[must_use]
    pub fn development() -> Self {
        Self::production()
    }

    #[must_use]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    #[must_use]
    pub const fn level_format(mut self, format: LevelFormat) -> Self {
        self.level_format = format;
        self
    }

    #[must_use]
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub const fn caller(mut self, enabled: bool) -> Self {
        self.caller = enabled;
        self
    }

    /// Renders one record, without the trailing newline.
    ///
    /// # Errors
    /// Returns `Error::Format` when JSON serialization fails.
    pub fn encode(&self, record: &LogRecord) -> Result<String, crate::Error> {
        let ts = record.time.format(&self.time_format).to_string();
        let caller = record
            .caller
            .filter(|_| self.caller)
            .map(short_caller);

        match self.encoding {
            Encoding::Console => {
                let mut line = ts;
                let _ = write!(line, "\t{}", self.level_format.render(record.level));
                if let Some(caller) = caller {
                    let _ = write!(line, "\t{caller}");
                }
                let _ = write!(line, "\t{}", record.message);
                Ok(line)
            }
            Encoding::Json => {
                // Escape codes have no place in JSON, so color is dropped here.
                let level = match self.level_format {
                    LevelFormat::Lowercase => record.level.as_str(),
                    LevelFormat::Capital | LevelFormat::CapitalColor => record.level.as_capital(),
                };
                let entry = JsonLine {
                    level,
                    ts,
                    caller,
                    msg: &record.message,
                };
                serde_json::to_string(&entry)
                    .map_err(|e| crate::Error::Format(format!("JSON serialization failed: {e}")))
            }
        }
    }
}

/// Trims a caller path to its last directory and file name, e.g. `src/main.rs:12`.
#[must_use]
pub fn short_caller(location: &Location<'_>) -> String {
    let file = location.file().replace('\\', "/");
    let short = file
        .rmatch_indices('/')
        .nth(1)
        .map_or(file.as_str(), |(idx, _)| &file[idx + 1..]);
    format!("{short}:{}", location.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(level: Level, msg: &str) -> LogRecord {
        LogRecord {
            level,
            message: msg.to_string(),
            time: Local.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap(),
            caller: None,
        }
    }

    #[test]
    fn console_line_is_tab_separated() {
        let enc = EncoderConfig::production().time_format("%Y-%m-%d %H:%M:%S");
        let line = enc.encode(&record(Level::Warn, "disk almost full")).unwrap();
        assert_eq!(line, "2024-03-09 08:05:01\tWARN\tdisk almost full");
    }

    #[test]
    fn caller_column_is_included_when_known() {
        let enc = EncoderConfig::production().time_format("%H");
        let rec = record(Level::Info, "x").caller(Location::caller());
        let line = enc.encode(&rec).unwrap();
        let cols: Vec<&str> = line.split('\t').collect();
        assert_eq!(cols.len(), 4);
        assert!(cols[2].starts_with("output/encoder.rs:"));
    }

    #[test]
    fn json_line_has_expected_keys() {
        let enc = EncoderConfig::production()
            .encoding(Encoding::Json)
            .time_format("%Y");
        let line = enc.encode(&record(Level::Error, "boom")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["ts"], "2024");
        assert_eq!(value["msg"], "boom");
        assert!(value.get("caller").is_none());
    }

    #[test]
    fn colored_level_wraps_capital_name() {
        let rendered = LevelFormat::CapitalColor.render(Level::Debug);
        assert_eq!(rendered, "\x1b[35mDEBUG\x1b[0m");
    }
}
