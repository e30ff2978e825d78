//! Thread hand-off primitives usable outside the logger

pub mod blocking_queue;

pub use blocking_queue::BlockingQueue;
