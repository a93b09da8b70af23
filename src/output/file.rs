//! File sink. Encodes records and hands whole lines to a writer, normally one
//! of the rolling writers.

use super::{EncoderConfig, LogRecord, Output};
use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Serializes writes to the wrapped writer so every line lands in one piece.
pub struct FileOutput {
    encoder: EncoderConfig,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for FileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileOutput")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl FileOutput {
    /// Production encoder over `writer`.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            encoder: EncoderConfig::production(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    #[must_use]
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }
}

impl Output for FileOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        let mut line = self.encoder.encode(record)?;
        line.push('\n');

        // A panic mid-write leaves the writer usable; keep logging rather than poisoning every later call.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush()?;
        Ok(())
    }
}
