//! Logger metrics for observability
//!
//! Counters for monitoring logger health: how many entries made it into the
//! queue, how many reached the sinks, and how many were turned away.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use odr_log::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_delivered(1);
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.delivered_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted by the event queue
    accepted: AtomicU64,

    /// Entries the worker fanned out to the sinks
    delivered: AtomicU64,

    /// Entries that never reached the sinks
    dropped: AtomicU64,

    /// Number of pushes that found the queue full
    queue_full_events: AtomicU64,

    /// Entries written straight to the fallback stream
    fallback_writes: AtomicU64,

    /// Sink calls that returned an error or panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            fallback_writes: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Acquire)
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Acquire)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fallback_writes(&self) -> u64 {
        self.fallback_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Count an entry before it is pushed, so the worker can never deliver
    /// an entry the counter does not include yet.
    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Release)
    }

    /// Undo [`record_accepted`](Self::record_accepted) for a push the queue
    /// turned away.
    #[inline]
    pub fn revoke_accepted(&self) -> u64 {
        self.accepted.fetch_sub(1, Ordering::Release)
    }

    /// Record `count` entries that reached every sink and were flushed
    #[inline]
    pub fn record_delivered(&self, count: u64) -> u64 {
        self.delivered.fetch_add(count, Ordering::Release)
    }

    /// Record a dropped entry, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_fallback_write(&self) -> u64 {
        self.fallback_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.accepted_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.fallback_writes.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted_count()),
            delivered: AtomicU64::new(self.delivered_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            fallback_writes: AtomicU64::new(self.fallback_writes()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.accepted_count(), 0);
        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.fallback_writes(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_dropped(), 0);
        assert_eq!(metrics.record_dropped(), 1);
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_revoked_acceptance_and_batched_delivery() {
        let metrics = LoggerMetrics::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_accepted();
        assert_eq!(metrics.revoke_accepted(), 3);
        assert_eq!(metrics.accepted_count(), 2);

        assert_eq!(metrics.record_delivered(2), 0);
        assert_eq!(metrics.delivered_count(), 2);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_accepted();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_accepted();
        metrics.record_sink_failure();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.accepted_count(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(snapshot.accepted_count(), 1);
        assert_eq!(snapshot.sink_failures(), 1);
    }
}
