//! Prebuffered producer/consumer pipeline
//!
//! A producer thread pushes frames into a `BlockingQueue`; the consumer
//! waits for a backlog of eight frames before it starts, then drains one
//! frame at a time. Both sides report through the shared logger.
//!
//! Run with: cargo run --example prebuffered_pipeline

use odr_log::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const FRAMES: usize = 32;
const PREBUFFER: usize = 8;

struct StderrSink;

impl Sink for StderrSink {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        eprintln!("{:5} {}", level, message);
        Ok(())
    }

    fn name(&self) -> &str {
        "STDERR"
    }
}

fn main() -> Result<()> {
    let logger = Arc::new(Logger::builder().sink(StderrSink).build()?);
    let queue: Arc<BlockingQueue<Vec<u8>>> = Arc::new(BlockingQueue::new());

    let producer = {
        let queue = Arc::clone(&queue);
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for frame in 0..FRAMES {
                let len = queue.push(vec![frame as u8; 96]);
                let _ = logger.level(LogLevel::Debug)
                    << "pushed frame "
                    << frame
                    << ", backlog "
                    << len;
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    let consumer = {
        let queue = Arc::clone(&queue);
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            let first = queue.wait_and_pop(PREBUFFER);
            logger.info(format!("prebuffer of {} reached, starting", PREBUFFER));

            let mut total = first.len();
            for _ in 1..FRAMES {
                total += queue.wait_and_pop(1).len();
            }
            logger.info(format!("consumed {} bytes", total));
        })
    };

    producer.join().expect("producer panicked");
    consumer.join().expect("consumer panicked");

    let mut logger =
        Arc::try_unwrap(logger).map_err(|_| LoggerError::other("logger still shared"))?;
    logger.shutdown()
}
