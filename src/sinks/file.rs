//! File sink implementation

use crate::core::{LogLevel, LoggerError, Result, Sink};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Open `path` for appending and take an exclusive advisory lock on it.
///
/// Shared by the text sinks so a destination is never written by two sinks
/// at once.
pub(crate) fn open_exclusive(path: &Path, what: &str) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::io_operation(
                format!("opening {}", what),
                path.display().to_string(),
                e,
            )
        })?;

    file.try_lock_exclusive()
        .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

    Ok(file)
}

/// Appends one plain text line per entry.
///
/// Lines start with the level name padded to five columns, except debug and
/// info lines which carry the bare message.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_exclusive(&path, "log file")?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_line(level: LogLevel, message: &str) -> String {
        match level.prefix() {
            Some(prefix) => format!("{:<5} {}\n", prefix, message),
            None => format!("{}\n", message),
        }
    }
}

impl Sink for FileSink {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        self.writer
            .write_all(Self::format_line(level, message).as_bytes())
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "FILE"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
        let _ = FileExt::unlock(self.writer.get_ref());
    }
}
