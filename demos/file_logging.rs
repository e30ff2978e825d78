//! File logging example
//!
//! Attaches a text file sink and a timing trace sink from a JSON
//! configuration.
//!
//! Run with: cargo run --example file_logging

use odr_log::prelude::*;
use odr_log::trace;

fn main() -> Result<()> {
    println!("=== ODR Log - File Logging Example ===\n");

    let config = LoggerConfig::from_json_str(
        r#"{
            "queue_capacity": 80,
            "overflow_policy": "alert_and_drop",
            "file": "modulator.log",
            "trace": "timing.csv"
        }"#,
    )?;
    let logger = config.build()?;
    println!("Sinks: {:?}", logger.sink_names());

    logger.info("Modulator started");
    logger.warn("Using default settings for some options");

    for frame in 0..5 {
        trace!(logger, "frame {} start", frame);
        std::thread::sleep(std::time::Duration::from_millis(2));
        trace!(logger, "frame {} end", frame);
    }

    logger.error("Failed to load optional plugin");
    logger.info("All frames processed");

    // Dropping the logger drains the queue and flushes both files
    drop(logger);

    println!("\n=== Example completed successfully! ===");
    println!("Check 'modulator.log' and 'timing.csv' for the output");

    Ok(())
}
