//! Logging macros for ergonomic log message formatting.
//!
//! These forward `format_args!` to [`Logger::log_fmt`](crate::Logger::log_fmt),
//! so they accept the same syntax as `format!`. Each evaluates to `true` if
//! the entry was queued.
//!
//! # Examples
//!
//! ```
//! use odr_log::prelude::*;
//! use odr_log::{info, alert};
//!
//! let logger = Logger::new().unwrap();
//!
//! info!(logger, "Modulator started");
//!
//! let rate = 2_048_000;
//! info!(logger, "Output sample rate {} S/s", rate);
//!
//! alert!(logger, "Lost sync on input {}: {}", 1, "timeout");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use odr_log::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use odr_log::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use odr_log::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use odr_log::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Alert, $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emerg {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Emerg, $($arg)+)
    };
}

/// Log a trace-level message; picked up by timing trace sinks.
///
/// # Examples
///
/// ```
/// # use odr_log::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use odr_log::trace;
/// trace!(logger, "frame {} start", 17);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}
