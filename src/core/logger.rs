//! Main logger implementation
//!
//! Caller threads build a [`LogEntry`] and push it onto the bounded event
//! queue without ever blocking. A dedicated worker thread owns the consuming
//! end, pops entries in arrival order and hands each one to every registered
//! sink in registration order. Dropping the logger closes the queue, lets the
//! worker drain the backlog and joins it.

use super::{
    error::{LoggerError, Result},
    event_queue::{self, EventReceiver, EventSender, PushError, DEFAULT_QUEUE_CAPACITY},
    fallback::FallbackStream,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    sink::Sink,
};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt::{self, Write as _};
use std::io::Write;
use std::ops::Shl;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Name given to the worker thread unless configured otherwise
pub const DEFAULT_WORKER_NAME: &str = "log-io";

/// Overflow alerts fire on the first drop and then once per this many drops
const ALERT_INTERVAL: u64 = 1000;

type SinkRegistry = Arc<Mutex<Vec<Box<dyn Sink>>>>;

/// Lifecycle of a [`Logger`]
///
/// `Created → Running → Draining → Stopped`. Draining is entered exactly
/// once, by [`Logger::shutdown`] or by dropping the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Queue allocated, worker not started yet
    Created,
    /// Worker active, entries accepted
    Running,
    /// Queue closed, worker flushing the backlog
    Draining,
    /// Worker joined
    Stopped,
}

pub struct Logger {
    sinks: SinkRegistry,
    sender: Option<EventSender>,
    io_handle: Option<thread::JoinHandle<()>>,
    state: Mutex<LoggerState>,
    capacity: usize,
    /// Metrics for observability (accepted, delivered, dropped, ...)
    metrics: Arc<LoggerMetrics>,
    /// Policy for handling queue overflow
    overflow_policy: OverflowPolicy,
    /// Optional callback for overflow notifications
    on_overflow: Option<OverflowCallback>,
    fallback: Arc<FallbackStream>,
}

impl Logger {
    /// Start a logger with the default queue capacity and no sinks.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::builder().capacity(capacity).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use odr_log::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .capacity(256)
    ///     .overflow_policy(OverflowPolicy::DropNewest)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.state(), LoggerState::Running);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn start(builder: LoggerBuilder) -> Result<Self> {
        let LoggerBuilder {
            capacity,
            sinks,
            overflow_policy,
            on_overflow,
            fallback,
            thread_name,
        } = builder;

        if capacity == 0 {
            return Err(LoggerError::config(
                "Logger",
                "event queue capacity must be non-zero",
            ));
        }
        if thread_name.contains('\0') {
            return Err(LoggerError::config(
                "Logger",
                "worker thread name must not contain NUL bytes",
            ));
        }

        let (sender, receiver) = event_queue::bounded(capacity);
        let fallback = Arc::new(match fallback {
            Some(writer) => FallbackStream::new(writer),
            None => FallbackStream::stderr(),
        });

        let mut logger = Self {
            sinks: Arc::new(Mutex::new(sinks)),
            sender: Some(sender),
            io_handle: None,
            state: Mutex::new(LoggerState::Created),
            capacity,
            metrics: Arc::new(LoggerMetrics::new()),
            overflow_policy,
            on_overflow,
            fallback,
        };

        let worker = IoWorker {
            receiver,
            sinks: Arc::clone(&logger.sinks),
            metrics: Arc::clone(&logger.metrics),
            fallback: Arc::clone(&logger.fallback),
        };

        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || worker.io_process())
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning logger worker",
                    format!("thread '{}'", thread_name),
                    e,
                )
            })?;

        logger.io_handle = Some(handle);
        *logger.state.lock() = LoggerState::Running;
        Ok(logger)
    }

    /// Append a sink to the registry.
    ///
    /// Entries already queued are delivered to it too if the worker has not
    /// reached them yet. Registration is meant for setup; it takes the same
    /// lock the worker holds while delivering one entry.
    pub fn register<S: Sink + 'static>(&self, sink: S) {
        self.register_boxed(Box::new(sink));
    }

    pub fn register_boxed(&self, sink: Box<dyn Sink>) {
        self.sinks.lock().push(sink);
    }

    /// Names of the registered sinks, in notification order
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks
            .lock()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Queue a message for every sink.
    ///
    /// Never blocks. Returns `false` if the entry did not make it into the
    /// queue, in which case the overflow policy has already handled it.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> bool {
        self.send_entry(LogEntry::new(level, message))
    }

    /// Queue a pre-formatted message; the target of the logging macros.
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) -> bool {
        self.log(level, fmt::format(args))
    }

    /// Start a line that is assembled piecewise and logged once, when the
    /// returned [`LogLine`] goes out of scope or is finished.
    ///
    /// # Example
    ///
    /// ```
    /// use odr_log::prelude::*;
    ///
    /// let logger = Logger::new().unwrap();
    /// let _ = logger.level(LogLevel::Info) << "tx gain = " << 21 << " dB";
    /// ```
    pub fn level(&self, level: LogLevel) -> LogLine<'_> {
        LogLine {
            logger: Some(self),
            level,
            buffer: String::new(),
        }
    }

    fn send_entry(&self, entry: LogEntry) -> bool {
        self.metrics.record_accepted();
        let pushed = match self.sender {
            Some(ref sender) => sender.push(entry),
            None => Err(PushError::Closed(entry)),
        };

        match pushed {
            Ok(()) => true,
            Err(err) => {
                self.metrics.revoke_accepted();
                self.handle_rejected(err);
                false
            }
        }
    }

    /// Apply the overflow policy to an entry the queue turned away
    fn handle_rejected(&self, err: PushError) {
        let queue_full = err.is_full();
        if queue_full {
            self.metrics.record_queue_full();
        }
        let entry = err.into_entry();

        match self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
            }
            OverflowPolicy::AlertAndDrop => self.alert_and_drop(queue_full),
            OverflowPolicy::Fallback => self.write_through(&entry),
        }
    }

    fn alert_and_drop(&self, queue_full: bool) {
        let total = self.metrics.record_dropped() + 1;

        if total != 1 && total % ALERT_INTERVAL != 0 {
            return;
        }

        if queue_full {
            self.fallback.write_line(&format!(
                "[LOGGER WARNING] Event queue full ({} slots), {} logs dropped. \
                 Consider a larger capacity or the Fallback overflow policy.",
                self.capacity,
                total
            ));
        } else {
            self.fallback.write_line(&format!(
                "[LOGGER WARNING] Logger stopped, {} logs dropped.",
                total
            ));
        }

        if let Some(ref callback) = self.on_overflow {
            callback(total);
        }
    }

    fn write_through(&self, entry: &LogEntry) {
        self.metrics.record_fallback_write();
        self.fallback.write_line(&format!(
            "[LOGGER OVERFLOW] {}: {}",
            entry.level(),
            entry.message()
        ));
    }

    /// Block until every accepted entry has been delivered and flushed, or
    /// until `timeout` elapses. Returns whether the queue drained.
    pub fn wait_until_drained(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.metrics.delivered_count() >= self.metrics.accepted_count() {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn state(&self) -> LoggerState {
        *self.state.lock()
    }

    /// Fixed capacity of the event queue
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently waiting for the worker
    pub fn queue_len(&self) -> usize {
        self.sender.as_ref().map_or(0, EventSender::len)
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use odr_log::Logger;
    ///
    /// let logger = Logger::with_capacity(100).unwrap();
    ///
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Delivered: {}", metrics.delivered_count());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn alert(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Alert, message)
    }

    #[inline]
    pub fn emerg(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Emerg, message)
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Trace, message)
    }

    /// Close the queue, let the worker deliver the backlog and join it.
    ///
    /// Calling it again after the first time is a no-op. Entries logged
    /// afterwards are handled by the overflow policy.
    ///
    /// # Example
    ///
    /// ```
    /// use odr_log::prelude::*;
    ///
    /// let mut logger = Logger::new().unwrap();
    /// logger.info("Important message");
    /// logger.shutdown().unwrap();
    /// assert_eq!(logger.state(), LoggerState::Stopped);
    /// ```
    pub fn shutdown(&mut self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if matches!(*state, LoggerState::Draining | LoggerState::Stopped) {
                return Ok(());
            }
            *state = LoggerState::Draining;
        }

        // Closing the channel is the shutdown signal
        drop(self.sender.take());

        let result = match self.io_handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|panic| LoggerError::WorkerPanicked(panic_message(&*panic))),
            None => Ok(()),
        };

        *self.state.lock() = LoggerState::Stopped;
        result
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            self.fallback
                .write_line(&format!("[LOGGER ERROR] Shutdown failed: {}", e));
        }

        // Report any dropped logs
        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            self.fallback.write_line(&format!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            ));
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state())
            .field("capacity", &self.capacity)
            .field("queue_len", &self.queue_len())
            .field("sinks", &self.sink_names())
            .field("overflow_policy", &self.overflow_policy)
            .finish_non_exhaustive()
    }
}

/// Consuming side of the event queue, moved onto the worker thread
struct IoWorker {
    receiver: EventReceiver,
    sinks: SinkRegistry,
    metrics: Arc<LoggerMetrics>,
    fallback: Arc<FallbackStream>,
}

impl IoWorker {
    /// Worker loop. Returns once the queue is closed and empty.
    fn io_process(self) {
        // Delivered only counts entries that have been flushed
        let mut unflushed = 0;

        while let Some(entry) = self.receiver.pop() {
            self.dispatch(&entry);
            unflushed += 1;

            // Flush whenever the backlog is cleared
            if self.receiver.is_empty() {
                self.flush_sinks();
                self.metrics.record_delivered(unflushed);
                unflushed = 0;
            }
        }

        self.flush_sinks();
        self.metrics.record_delivered(unflushed);
    }

    /// Hand one entry to every sink in registration order.
    ///
    /// Each sink is isolated with `catch_unwind` so a failing or panicking
    /// sink does not keep the others from receiving the entry.
    fn dispatch(&self, entry: &LogEntry) {
        let mut sinks = self.sinks.lock();

        for sink in sinks.iter_mut() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                sink.log(entry.level(), entry.message())
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.metrics.record_sink_failure();
                    self.fallback.write_line(&format!(
                        "[LOGGER ERROR] Sink '{}' failed: {}",
                        sink.name(),
                        e
                    ));
                }
                Err(panic_info) => {
                    self.metrics.record_sink_failure();
                    self.fallback.write_line(&format!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        sink.name(),
                        panic_message(&*panic_info)
                    ));
                }
            }
        }
    }

    fn flush_sinks(&self) {
        let mut sinks = self.sinks.lock();

        for sink in sinks.iter_mut() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| sink.flush()));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.fallback.write_line(&format!(
                        "[LOGGER ERROR] Sink '{}' flush failed: {}",
                        sink.name(),
                        e
                    ));
                }
                Err(panic_info) => {
                    self.fallback.write_line(&format!(
                        "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}",
                        sink.name(),
                        panic_message(&*panic_info)
                    ));
                }
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// A log line assembled from fragments.
///
/// Whatever has been appended is logged as exactly one entry when the line
/// is dropped or [`finish`](LogLine::finish)ed, on every exit path of the
/// enclosing scope.
pub struct LogLine<'a> {
    logger: Option<&'a Logger>,
    level: LogLevel,
    buffer: String,
}

impl<'a> LogLine<'a> {
    #[must_use = "the appended line is returned; dropping it emits the entry"]
    pub fn append(mut self, value: impl fmt::Display) -> Self {
        self.push(value);
        self
    }

    pub fn push(&mut self, value: impl fmt::Display) -> &mut Self {
        let _ = write!(self.buffer, "{}", value);
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Emit now instead of at scope exit. Returns whether the entry was
    /// queued.
    pub fn finish(mut self) -> bool {
        self.emit()
    }

    fn emit(&mut self) -> bool {
        match self.logger.take() {
            Some(logger) => logger.log(self.level, std::mem::take(&mut self.buffer)),
            None => false,
        }
    }
}

impl fmt::Write for LogLine<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl<'a, T: fmt::Display> Shl<T> for LogLine<'a> {
    type Output = LogLine<'a>;

    fn shl(self, value: T) -> Self::Output {
        self.append(value)
    }
}

impl Drop for LogLine<'_> {
    fn drop(&mut self) {
        self.emit();
    }
}

impl fmt::Debug for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogLine")
            .field("level", &self.level)
            .field("text", &self.buffer)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use odr_log::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .capacity(80)
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    capacity: usize,
    sinks: Vec<Box<dyn Sink>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    fallback: Option<Box<dyn Write + Send>>,
    thread_name: String,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            sinks: Vec::new(),
            overflow_policy: OverflowPolicy::AlertAndDrop,
            on_overflow: None,
            fallback: None,
            thread_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }

    /// Set the fixed capacity of the event queue
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Add a sink; sinks are notified in the order they are added
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Set the overflow policy. Default is `AlertAndDrop`.
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// Invoked alongside the `AlertAndDrop` warnings with the total count of
    /// dropped logs.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Replace stderr as the fallback stream
    #[must_use = "builder methods return a new value"]
    pub fn fallback_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.fallback = Some(Box::new(writer));
        self
    }

    /// Name of the worker thread
    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Spawn the worker and return the running logger
    pub fn build(self) -> Result<Logger> {
        Logger::start(self)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::io;
    use std::sync::atomic::{AtomicU64, Ordering};

    type Received = Arc<Mutex<Vec<(LogLevel, String)>>>;

    struct CollectSink {
        name: &'static str,
        received: Received,
    }

    impl Sink for CollectSink {
        fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
            self.received.lock().push((level, message.to_string()));
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn collect(name: &'static str) -> (CollectSink, Received) {
        let received = Received::default();
        (
            CollectSink {
                name,
                received: Arc::clone(&received),
            },
            received,
        )
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build().unwrap();
        assert_eq!(logger.capacity(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(logger.overflow_policy(), OverflowPolicy::AlertAndDrop);
        assert_eq!(logger.state(), LoggerState::Running);
        assert!(logger.sink_names().is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Logger::with_capacity(0).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_worker_thread_is_named() {
        let seen = Arc::new(Mutex::new(None));

        struct ThreadNameSink(Arc<Mutex<Option<String>>>);
        impl Sink for ThreadNameSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                *self.0.lock() = thread::current().name().map(String::from);
                Ok(())
            }
            fn name(&self) -> &str {
                "thread-name"
            }
        }

        let logger = Logger::builder()
            .thread_name("modulator-log")
            .sink(ThreadNameSink(Arc::clone(&seen)))
            .build()
            .unwrap();
        logger.info("where am I");
        drop(logger);

        assert_eq!(seen.lock().as_deref(), Some("modulator-log"));
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        struct OrderSink(&'static str, Arc<Mutex<Vec<&'static str>>>);
        impl Sink for OrderSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                self.1.lock().push(self.0);
                Ok(())
            }
            fn name(&self) -> &str {
                self.0
            }
        }

        let logger = Logger::new().unwrap();
        logger.register(OrderSink("first", Arc::clone(&order)));
        logger.register(OrderSink("second", Arc::clone(&order)));
        assert_eq!(logger.sink_names(), vec!["first", "second"]);

        logger.info("one");
        logger.info("two");
        drop(logger);

        assert_eq!(*order.lock(), vec!["first", "second", "first", "second"]);
    }

    #[test]
    fn test_log_line_emits_once() {
        let (sink, received) = collect("collect");
        let logger = Logger::builder().sink(sink).build().unwrap();

        {
            let _line = logger.level(LogLevel::Warn) << "a" << "b" << "c";
        }
        drop(logger);

        assert_eq!(
            *received.lock(),
            vec![(LogLevel::Warn, "abc".to_string())]
        );
    }

    #[test]
    fn test_log_line_mixed_fragments() {
        let (sink, received) = collect("collect");
        let logger = Logger::builder().sink(sink).build().unwrap();

        let mut line = logger.level(LogLevel::Info);
        line.push("rate = ");
        write!(line, "{}", 2048).unwrap();
        let line = line.append(" kS/s");
        assert_eq!(line.text(), "rate = 2048 kS/s");
        assert!(line.finish());
        drop(logger);

        assert_eq!(received.lock().len(), 1);
        assert_eq!(received.lock()[0].1, "rate = 2048 kS/s");
    }

    #[test]
    fn test_log_line_emitted_on_early_return() {
        fn configure(logger: &Logger, fail: bool) -> std::result::Result<(), ()> {
            let mut line = logger.level(LogLevel::Error);
            line.push("configure: ");
            if fail {
                line.push("failed");
                return Err(());
            }
            line.push("ok");
            Ok(())
        }

        let (sink, received) = collect("collect");
        let logger = Logger::builder().sink(sink).build().unwrap();
        assert!(configure(&logger, true).is_err());
        assert!(configure(&logger, false).is_ok());
        drop(logger);

        let messages: Vec<String> = received.lock().iter().map(|(_, m)| m.clone()).collect();
        assert_eq!(messages, vec!["configure: failed", "configure: ok"]);
    }

    #[test]
    fn test_empty_debug_entry_is_delivered() {
        let (sink, received) = collect("collect");
        let logger = Logger::builder().sink(sink).build().unwrap();
        logger.debug("");
        logger.info("after");
        drop(logger);

        assert_eq!(
            *received.lock(),
            vec![
                (LogLevel::Debug, String::new()),
                (LogLevel::Info, "after".to_string())
            ]
        );
    }

    #[test]
    fn test_shutdown_transitions_once() {
        let (sink, received) = collect("collect");
        let mut logger = Logger::builder().sink(sink).build().unwrap();
        for i in 0..10 {
            logger.info(format!("Message {}", i));
        }

        logger.shutdown().unwrap();
        assert_eq!(logger.state(), LoggerState::Stopped);
        assert_eq!(received.lock().len(), 10);

        // Second call is a no-op
        logger.shutdown().unwrap();
        assert_eq!(logger.state(), LoggerState::Stopped);
    }

    #[test]
    fn test_log_after_shutdown_is_dropped() {
        let fallback = SharedBuf::default();
        let (sink, received) = collect("collect");
        let mut logger = Logger::builder()
            .sink(sink)
            .fallback_writer(fallback.clone())
            .build()
            .unwrap();
        logger.shutdown().unwrap();

        assert!(!logger.info("too late"));
        assert_eq!(logger.dropped_count(), 1);
        assert!(received.lock().is_empty());
        assert!(fallback.text().contains("Logger stopped"));
    }

    #[test]
    fn test_failing_sink_does_not_starve_others() {
        struct FailingSink;
        impl Sink for FailingSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                Err(LoggerError::other("disk gone"))
            }
            fn name(&self) -> &str {
                "failing"
            }
        }

        struct PanickingSink;
        impl Sink for PanickingSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                panic!("sink exploded");
            }
            fn name(&self) -> &str {
                "panicking"
            }
        }

        let fallback = SharedBuf::default();
        let (sink, received) = collect("collect");
        let logger = Logger::builder()
            .sink(FailingSink)
            .sink(PanickingSink)
            .sink(sink)
            .fallback_writer(fallback.clone())
            .build()
            .unwrap();

        logger.error("still delivered");
        assert!(logger.wait_until_drained(Duration::from_secs(5)));
        assert_eq!(logger.metrics().sink_failures(), 2);
        drop(logger);

        assert_eq!(received.lock().len(), 1);
        let text = fallback.text();
        assert!(text.contains("Sink 'failing' failed: disk gone"));
        assert!(text.contains("Sink 'panicking' panicked: sink exploded"));
    }

    #[test]
    fn test_overflow_callback_and_alert() {
        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
        let (started_tx, started_rx) = crossbeam_channel::bounded::<()>(1);

        struct GateSink {
            started: crossbeam_channel::Sender<()>,
            gate: crossbeam_channel::Receiver<()>,
        }
        impl Sink for GateSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                let _ = self.started.try_send(());
                let _ = self.gate.recv();
                Ok(())
            }
            fn name(&self) -> &str {
                "gate"
            }
        }

        let fallback = SharedBuf::default();
        let alerts = Arc::new(AtomicU64::new(0));
        let alerts_clone = Arc::clone(&alerts);

        let logger = Logger::builder()
            .capacity(2)
            .sink(GateSink {
                started: started_tx,
                gate: gate_rx,
            })
            .fallback_writer(fallback.clone())
            .on_overflow(Arc::new(move |count| {
                alerts_clone.store(count, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        // Park the worker inside the sink, then fill the queue
        assert!(logger.info("first"));
        started_rx.recv().unwrap();
        assert!(logger.info("queued 1"));
        assert!(logger.info("queued 2"));
        assert!(!logger.info("dropped"));

        assert_eq!(logger.dropped_count(), 1);
        assert_eq!(logger.metrics().queue_full_events(), 1);
        assert_eq!(alerts.load(Ordering::SeqCst), 1);
        assert!(fallback.text().contains("Event queue full (2 slots)"));

        drop(gate_tx);
        drop(logger);
    }

    #[test]
    fn test_overflow_alerts_on_first_and_every_thousandth_drop() {
        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
        let (started_tx, started_rx) = crossbeam_channel::bounded::<()>(1);

        struct HoldSink {
            started: crossbeam_channel::Sender<()>,
            gate: crossbeam_channel::Receiver<()>,
        }
        impl Sink for HoldSink {
            fn log(&mut self, _level: LogLevel, _message: &str) -> Result<()> {
                let _ = self.started.try_send(());
                let _ = self.gate.recv();
                Ok(())
            }
            fn name(&self) -> &str {
                "hold"
            }
        }

        let fallback = SharedBuf::default();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let counts_clone = Arc::clone(&counts);

        let logger = Logger::builder()
            .capacity(1)
            .sink(HoldSink {
                started: started_tx,
                gate: gate_rx,
            })
            .fallback_writer(fallback.clone())
            .on_overflow(Arc::new(move |count| counts_clone.lock().push(count)))
            .build()
            .unwrap();

        assert!(logger.info("held"));
        started_rx.recv().unwrap();
        assert!(logger.info("queued"));

        for i in 0..2500 {
            assert!(!logger.info(format!("overflow {}", i)));
        }

        assert_eq!(logger.dropped_count(), 2500);
        assert_eq!(*counts.lock(), vec![1, 1000, 2000]);
        let text = fallback.text();
        assert_eq!(text.matches("Event queue full").count(), 3);
        assert!(text.contains("1000 logs dropped"));
        assert!(text.contains("2000 logs dropped"));

        drop(gate_tx);
        drop(logger);
    }
}
