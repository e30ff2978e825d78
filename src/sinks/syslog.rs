//! System log sink
//!
//! Forwards entries to the local syslog daemon through `openlog(3)` and
//! `syslog(3)`. The syslog connection is process wide: the most recently
//! created sink decides the identifier and facility, and dropping any
//! `SyslogSink` closes the connection.

use crate::core::{LogLevel, LoggerError, Result, Sink};
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::os::raw::c_int;

/// Identifier used when none is configured
pub const DEFAULT_SYSLOG_IDENT: &str = "odr-log";

/// Syslog facility the sink logs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    User,
    Daemon,
    #[default]
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

impl Facility {
    fn as_raw(self) -> c_int {
        match self {
            Facility::User => libc::LOG_USER,
            Facility::Daemon => libc::LOG_DAEMON,
            Facility::Local0 => libc::LOG_LOCAL0,
            Facility::Local1 => libc::LOG_LOCAL1,
            Facility::Local2 => libc::LOG_LOCAL2,
            Facility::Local3 => libc::LOG_LOCAL3,
            Facility::Local4 => libc::LOG_LOCAL4,
            Facility::Local5 => libc::LOG_LOCAL5,
            Facility::Local6 => libc::LOG_LOCAL6,
            Facility::Local7 => libc::LOG_LOCAL7,
        }
    }
}

/// Syslog priority for a level; `None` for levels syslog does not carry.
pub fn syslog_priority(level: LogLevel) -> Option<c_int> {
    match level {
        LogLevel::Debug => Some(libc::LOG_DEBUG),
        LogLevel::Info => Some(libc::LOG_INFO),
        LogLevel::Warn => Some(libc::LOG_WARNING),
        LogLevel::Error => Some(libc::LOG_ERR),
        LogLevel::Alert => Some(libc::LOG_ALERT),
        LogLevel::Emerg => Some(libc::LOG_EMERG),
        LogLevel::Trace => None,
    }
}

pub struct SyslogSink {
    // openlog keeps the pointer, so the string lives as long as the sink
    ident: CString,
    facility: Facility,
}

impl SyslogSink {
    pub fn new(ident: &str, facility: Facility) -> Result<Self> {
        let ident = CString::new(ident)
            .map_err(|_| LoggerError::syslog("identifier contains a NUL byte"))?;

        // SAFETY: `ident` is NUL-terminated and owned by the returned sink,
        // which calls closelog before releasing it.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, facility.as_raw());
        }

        Ok(Self { ident, facility })
    }

    pub fn ident(&self) -> &str {
        self.ident.to_str().unwrap_or(DEFAULT_SYSLOG_IDENT)
    }

    pub fn facility(&self) -> Facility {
        self.facility
    }
}

impl Sink for SyslogSink {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        let Some(priority) = syslog_priority(level) else {
            return Ok(());
        };

        let message = CString::new(message.replace('\0', "\\0"))
            .map_err(|_| LoggerError::syslog("message contains a NUL byte"))?;

        // SAFETY: both pointers are valid NUL-terminated strings and the
        // format string consumes exactly one `%s` argument.
        unsafe {
            libc::syslog(priority, b"%s\0".as_ptr().cast(), message.as_ptr());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "SYSLOG"
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        // SAFETY: closelog takes no arguments and is always safe to call
        unsafe {
            libc::closelog();
        }
    }
}
