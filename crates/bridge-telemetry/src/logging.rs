//! Subscriber installation and structured log helpers.
//!
//! Every bridge log line carries a consistent set of fields so that JSON
//! output can be filtered without parsing messages:
//! - `block_number` / `block_hash` for per-block pipeline steps
//! - `content_key` for anything tied to one content item
//! - `endpoint` / `peers_reached` for offer results

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails if the filter directive does not parse or a subscriber is already
/// installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init()
    };
    installed.map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

pub(crate) fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive)
        .map_err(|e| TelemetryError::Config(format!("invalid log filter {directive:?}: {e}")))
}

/// Log a block-related event with standard fields.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $msg:expr, $block_number:expr, $block_hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            block_number = $block_number,
            block_hash = ?$block_hash,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a content-item event with standard fields.
#[macro_export]
macro_rules! log_content_event {
    ($level:ident, $msg:expr, $content_key:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            content_key = %$content_key,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_levels_and_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warn,pb_03_content_propagation=debug").is_ok());
    }

    #[test]
    fn test_filter_rejects_garbage() {
        let err = build_filter("info,pb_bridge=loudest").unwrap_err();
        assert!(matches!(err, TelemetryError::Config(_)));
    }

    #[test]
    fn test_macros_expand() {
        let hash = [0u8; 4];
        crate::log_block_event!(info, "Block processed", 7u64, hash);
        crate::log_block_event!(warn, "Block failed", 7u64, hash, error = "boom");
        crate::log_content_event!(debug, "Offer result", "0x00ab", endpoint = "a", peers_reached = 3u64);
    }
}
