//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log entry.
///
/// The declaration order is the total order. `Trace` sorts last: it is a
/// verbose timing channel, not a lower severity than `Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Alert = 4,
    Emerg = 5,
    Trace = 6,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Alert,
        LogLevel::Emerg,
        LogLevel::Trace,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Alert => "ALERT",
            LogLevel::Emerg => "EMERG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Line prefix used by text sinks. Debug and info lines carry none.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            LogLevel::Debug | LogLevel::Info => None,
            other => Some(other.to_str()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "ALERT" => Ok(LogLevel::Alert),
            "EMERG" | "EMERGENCY" => Ok(LogLevel::Emerg),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
