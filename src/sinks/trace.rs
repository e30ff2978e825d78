//! Timing trace sink
//!
//! Records trace-level entries as `offset,message` CSV rows, where the offset
//! is in microseconds since the sink was created. Other levels are ignored.

use super::file::open_exclusive;
use crate::core::{LogLevel, LoggerError, Result, Sink};
use chrono::Utc;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct TraceSink {
    writer: BufWriter<File>,
    path: PathBuf,
    startup: Instant,
}

impl TraceSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_exclusive(&path, "trace file")?;
        let mut writer = BufWriter::new(file);

        let startup = Instant::now();
        writeln!(
            writer,
            "0,TRACER,startup at {}",
            Utc::now().timestamp_micros()
        )
        .and_then(|()| writer.flush())
        .map_err(|e| {
            LoggerError::io_operation("writing trace header", path.display().to_string(), e)
        })?;

        Ok(Self {
            writer,
            path,
            startup,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for TraceSink {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        if level != LogLevel::Trace {
            return Ok(());
        }

        let micros = self.startup.elapsed().as_micros();
        writeln!(self.writer, "{},{}", micros, message)
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "TRACER"
    }
}

impl Drop for TraceSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
        let _ = fs2::FileExt::unlock(self.writer.get_ref());
    }
}
