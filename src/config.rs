//! Declarative logger configuration
//!
//! A serde-backed description of which sinks to attach and how the event
//! queue behaves, loadable from JSON.
//!
//! ```
//! use odr_log::LoggerConfig;
//!
//! let config = LoggerConfig::from_json_str(r#"{
//!     "queue_capacity": 128,
//!     "overflow_policy": "fallback"
//! }"#).unwrap();
//! let logger = config.build().unwrap();
//! assert_eq!(logger.capacity(), 128);
//! ```

use crate::core::{
    event_queue::DEFAULT_QUEUE_CAPACITY, logger::DEFAULT_WORKER_NAME, Logger, LoggerBuilder,
    LoggerError, OverflowPolicy, Result,
};
#[cfg(all(unix, feature = "syslog"))]
use crate::sinks::syslog::{Facility, SyslogSink, DEFAULT_SYSLOG_IDENT};
use crate::sinks::{FileSink, TraceSink};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub queue_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub thread_name: String,
    #[cfg(all(unix, feature = "syslog"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog: Option<SyslogConfig>,
    /// Plain text log file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Timing trace CSV file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PathBuf>,
}

#[cfg(all(unix, feature = "syslog"))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyslogConfig {
    pub ident: String,
    pub facility: Facility,
}

#[cfg(all(unix, feature = "syslog"))]
impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            ident: DEFAULT_SYSLOG_IDENT.to_string(),
            facility: Facility::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            thread_name: DEFAULT_WORKER_NAME.to_string(),
            #[cfg(all(unix, feature = "syslog"))]
            syslog: None,
            file: None,
            trace: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logger config", path.display().to_string(), e)
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be non-zero",
            ));
        }
        if self.thread_name.is_empty() || self.thread_name.contains('\0') {
            return Err(LoggerError::config(
                "LoggerConfig",
                "thread_name must be non-empty and free of NUL bytes",
            ));
        }
        if self.file.is_some() && self.file == self.trace {
            return Err(LoggerError::config(
                "LoggerConfig",
                "file and trace sinks cannot share a destination",
            ));
        }
        Ok(())
    }

    /// Open the configured sinks and return a builder holding them, in the
    /// order syslog, file, trace. Callers can still attach a fallback writer
    /// or an overflow callback before building.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        self.validate()?;

        #[allow(unused_mut)]
        let mut builder = Logger::builder()
            .capacity(self.queue_capacity)
            .overflow_policy(self.overflow_policy)
            .thread_name(self.thread_name.clone());

        #[cfg(all(unix, feature = "syslog"))]
        {
            if let Some(ref syslog) = self.syslog {
                builder = builder.sink(SyslogSink::new(&syslog.ident, syslog.facility)?);
            }
        }
        if let Some(ref path) = self.file {
            builder = builder.sink(FileSink::new(path)?);
        }
        if let Some(ref path) = self.trace {
            builder = builder.sink(TraceSink::new(path)?);
        }

        Ok(builder)
    }

    pub fn build(&self) -> Result<Logger> {
        self.builder()?.build()
    }
}
