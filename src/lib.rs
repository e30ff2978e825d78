//! # ODR Log
//!
//! Two thread hand-off primitives for producer/consumer pipelines:
//!
//! - [`Logger`]: an asynchronous event logger. Any thread can log without
//!   blocking; a dedicated worker thread drains a fixed-capacity queue and
//!   fans each entry out to the registered [`Sink`]s (syslog, file, timing
//!   trace).
//! - [`BlockingQueue`]: a mutex/condvar FIFO whose consumer can wait for a
//!   minimum backlog ("prebuffering") before taking items.
//!
//! ```
//! use odr_log::prelude::*;
//!
//! let logger = Logger::builder().capacity(80).build().unwrap();
//! logger.info("modulator started");
//! let _ = logger.level(LogLevel::Warn) << "underrun on channel " << 3;
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;
pub mod sync;

pub mod prelude {
    #[cfg(all(unix, feature = "syslog"))]
    pub use crate::sinks::{Facility, SyslogSink};
    pub use crate::sinks::{FileSink, TraceSink};
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        LogEntry, LogLevel, LogLine, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        LoggerState, OverflowCallback, OverflowPolicy, Result, Sink,
    };
    pub use crate::sync::BlockingQueue;
}

pub use config::LoggerConfig;
pub use core::{
    LogEntry, LogLevel, LogLine, Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggerState,
    OverflowCallback, OverflowPolicy, Result, Sink, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_NAME,
};
#[cfg(all(unix, feature = "syslog"))]
pub use sinks::{Facility, SyslogSink};
pub use sinks::{FileSink, TraceSink};
pub use sync::BlockingQueue;
