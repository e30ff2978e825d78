//! Bounded event queue between caller threads and the logger worker
//!
//! A fixed-capacity channel built on `crossbeam_channel::bounded`. Pushing
//! never blocks: a full queue hands the entry back to the caller so the
//! overflow policy can decide what to do with it. The receiving side is owned
//! by exactly one worker thread and observes entries in arrival order.
//!
//! Closing is explicit: once every [`EventSender`] is dropped the receiver
//! drains what is left and then reports the end of the stream. No entry
//! value doubles as a shutdown marker.

use super::log_entry::LogEntry;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::fmt;
use std::time::Duration;

/// Capacity used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 80;

/// Create a queue holding at most `capacity` entries.
///
/// # Panics
///
/// Panics if `capacity` is 0. A zero-capacity crossbeam channel is a
/// rendezvous channel, which would make every non-blocking push fail.
pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
    assert!(capacity > 0, "event queue capacity must be non-zero");
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (
        EventSender { inner: tx, capacity },
        EventReceiver { inner: rx },
    )
}

/// Why a push was rejected. The entry is handed back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    Full(LogEntry),
    Closed(LogEntry),
}

impl PushError {
    pub fn into_entry(self) -> LogEntry {
        match self {
            PushError::Full(entry) | PushError::Closed(entry) => entry,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, PushError::Full(_))
    }
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Full(_) => write!(f, "event queue is full"),
            PushError::Closed(_) => write!(f, "event queue is closed"),
        }
    }
}

impl std::error::Error for PushError {}

#[derive(Clone)]
pub struct EventSender {
    inner: Sender<LogEntry>,
    capacity: usize,
}

impl EventSender {
    /// Enqueue without blocking.
    pub fn push(&self, entry: LogEntry) -> Result<(), PushError> {
        self.inner.try_send(entry).map_err(|e| match e {
            TrySendError::Full(entry) => PushError::Full(entry),
            TrySendError::Disconnected(entry) => PushError::Closed(entry),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for EventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

pub struct EventReceiver {
    inner: Receiver<LogEntry>,
}

impl EventReceiver {
    /// Wait for the next entry.
    ///
    /// Returns `None` only once all senders are gone and the queue is empty.
    pub fn pop(&self) -> Option<LogEntry> {
        self.inner.recv().ok()
    }

    pub fn pop_timeout(&self, timeout: Duration) -> Result<LogEntry, RecvTimeoutError> {
        self.inner.recv_timeout(timeout)
    }

    pub fn try_pop(&self) -> Option<LogEntry> {
        match self.inner.try_recv() {
            Ok(entry) => Some(entry),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for EventReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventReceiver")
            .field("len", &self.len())
            .finish()
    }
}
