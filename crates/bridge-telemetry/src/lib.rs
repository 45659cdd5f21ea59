//! # Bridge Telemetry
//!
//! Logging for the Portal bridge: one `tracing-subscriber` stack with an
//! environment-driven filter and either human-readable or JSON output.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full filter directive, takes precedence |
//! | `PB_LOG_LEVEL` | `info` | Log level filter |
//! | `PB_JSON_LOGS` | `false` | JSON output (defaults to `true` in containers) |
//! | `PB_SERVICE_NAME` | `portal-bridge` | Service name in logs |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}
