//! Basic logger usage example
//!
//! Demonstrates the per-level calls, the formatting macros and streamed
//! lines, delivered to a sink that prints on stdout.
//!
//! Run with: cargo run --example basic_usage

use odr_log::prelude::*;
use odr_log::{alert, info};

/// Prints every entry the worker hands it
struct StdoutSink;

impl Sink for StdoutSink {
    fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        println!("[{:5}] {}", level, message);
        Ok(())
    }

    fn name(&self) -> &str {
        "STDOUT"
    }
}

fn main() -> Result<()> {
    println!("=== ODR Log - Basic Usage Example ===\n");

    let mut logger = Logger::builder().sink(StdoutSink).build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.alert("This is an alert message");
    logger.emerg("This is an emergency message");
    logger.trace("This is a trace message");

    println!("\n2. Formatting macros:");
    info!(logger, "Output sample rate {} S/s", 2_048_000);
    alert!(logger, "Lost sync on input {}", 1);

    println!("\n3. Streamed lines:");
    let _ = logger.level(LogLevel::Info) << "tx gain = " << 21 << " dB";
    {
        let mut line = logger.level(LogLevel::Warn);
        for channel in 0..4 {
            line.push(format_args!("ch{} ", channel));
        }
        line.push("late");
    }

    // Wait for the worker to print everything
    logger.shutdown()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
