//! Sink implementations

pub mod file;
#[cfg(all(unix, feature = "syslog"))]
pub mod syslog;
pub mod trace;

pub use file::FileSink;
#[cfg(all(unix, feature = "syslog"))]
pub use syslog::{Facility, SyslogSink};
pub use trace::TraceSink;

pub use crate::core::Sink;
