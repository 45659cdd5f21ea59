//! Application layer: fan-out client and retry loop.

pub mod client;
pub mod scheduler;

pub use client::PropagationClient;
pub use scheduler::{shutdown_requested, RetryReport, RetryScheduler};
