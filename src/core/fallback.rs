//! Direct output path that bypasses the event queue
//!
//! Used for the logger's own diagnostics (overflow warnings, sink failures)
//! and for the `Fallback` overflow policy. One mutex serializes every writer
//! so lines from different threads never interleave.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

pub(crate) struct FallbackStream {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl FallbackStream {
    pub(crate) fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub(crate) fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Write one line and flush. Failures are ignored: there is nowhere
    /// left to report them.
    pub(crate) fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

impl fmt::Debug for FallbackStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_from_threads_do_not_interleave() {
        let buffer = Shared::default();
        let stream = Arc::new(FallbackStream::new(Box::new(buffer.clone())));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let stream = Arc::clone(&stream);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        stream.write_line(&format!("thread {} line {}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(text.lines().count(), 200);
        assert!(text.lines().all(|l| l.starts_with("thread ")));
    }
}
