//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// An output destination fed by the logger worker thread.
///
/// Only the worker thread calls `log` and `flush`, so implementations need
/// no internal locking and only have to be `Send`. Errors returned here are
/// reported on the logger's fallback stream and never reach the calling
/// thread.
pub trait Sink: Send {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
