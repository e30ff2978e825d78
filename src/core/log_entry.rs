//! Log entry structure

use super::log_level::LogLevel;

/// A single severity + message pair travelling from a caller thread to the
/// logger worker. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    level: LogLevel,
    message: String,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// A single trailing line ending is dropped, since sinks terminate lines
    /// themselves. Embedded newlines and carriage returns are escaped so
    /// that one log call always produces one output line.
    fn sanitize_message(mut message: String) -> String {
        if message.ends_with('\n') {
            message.pop();
            if message.ends_with('\r') {
                message.pop();
            }
        }
        if !message.contains(['\n', '\r']) {
            return message;
        }
        message.replace('\n', "\\n").replace('\r', "\\r")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.into()),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_parts(self) -> (LogLevel, String) {
        (self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message_untouched() {
        let entry = LogEntry::new(LogLevel::Warn, "tx gain 3 dB");
        assert_eq!(entry.level(), LogLevel::Warn);
        assert_eq!(entry.message(), "tx gain 3 dB");
    }

    #[test]
    fn test_embedded_line_breaks_escaped() {
        let entry = LogEntry::new(LogLevel::Info, "a\nb\rc");
        assert_eq!(entry.message(), "a\\nb\\rc");
    }

    #[test]
    fn test_one_trailing_newline_trimmed() {
        assert_eq!(LogEntry::new(LogLevel::Info, "frame done\n").message(), "frame done");
        assert_eq!(LogEntry::new(LogLevel::Info, "frame done\r\n").message(), "frame done");
        assert_eq!(
            LogEntry::new(LogLevel::Info, "frame done\n\n").message(),
            "frame done\\n"
        );
    }

    #[test]
    fn test_tabs_kept() {
        let entry = LogEntry::new(LogLevel::Debug, "ch\t1\t-3 dB");
        assert_eq!(entry.message(), "ch\t1\t-3 dB");
    }

    #[test]
    fn test_empty_message_is_a_regular_entry() {
        let entry = LogEntry::new(LogLevel::Debug, "");
        assert_eq!(entry.into_parts(), (LogLevel::Debug, String::new()));
    }
}
