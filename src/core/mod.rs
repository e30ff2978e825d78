//! Core logger types and traits

pub mod error;
pub mod event_queue;
mod fallback;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod sink;

pub use error::{LoggerError, Result};
pub use event_queue::{EventReceiver, EventSender, PushError, DEFAULT_QUEUE_CAPACITY};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{LogLine, Logger, LoggerBuilder, LoggerState, DEFAULT_WORKER_NAME};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use sink::Sink;
