//! Overflow policies for the bounded event queue
//!
//! When the event queue is full, these policies determine what happens to
//! the entry that did not fit. None of them blocks the calling thread and
//! none of them grows the queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Policy for handling queue overflow
///
/// # Example
///
/// ```
/// use odr_log::OverflowPolicy;
///
/// // Default behavior: alert and drop
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum OverflowPolicy {
    /// Drop the entry and only count it.
    DropNewest,

    /// Drop the entry, warn on the fallback stream and run the overflow
    /// callback on the first drop and every 1000th one after that.
    #[default]
    AlertAndDrop,

    /// Write the entry itself to the fallback stream, bypassing the queue
    /// and the sinks.
    Fallback,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
            OverflowPolicy::Fallback => write!(f, "Fallback"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when logs are dropped due to queue overflow.
/// The parameter is the total count of dropped logs so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
        assert_eq!(OverflowPolicy::Fallback.to_string(), "Fallback");
    }

    #[test]
    fn test_overflow_policy_serde() {
        let policy: OverflowPolicy = serde_json::from_str("\"drop_newest\"").unwrap();
        assert_eq!(policy, OverflowPolicy::DropNewest);
        assert_eq!(
            serde_json::to_string(&OverflowPolicy::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
