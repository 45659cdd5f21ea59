//! # Error Types
//!
//! Transport-level failures shared by every JSON-RPC adapter.

use thiserror::Error;

/// Errors that can occur when talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The endpoint could not be reached at all (refused, DNS, timeout on
    /// connect). Callers treat this as transient.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// HTTP-level failure after a connection was made.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl RpcError {
    /// True when retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Connection(_) => true,
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Rpc { .. } | RpcError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RpcError::Connection("refused".into()).is_transient());
        assert!(!RpcError::Parse("bad".into()).is_transient());
        assert!(!RpcError::Rpc {
            code: -32601,
            message: "method not found".into()
        }
        .is_transient());
    }

    #[test]
    fn test_display() {
        let err = RpcError::Rpc {
            code: -32000,
            message: "filter not found".into(),
        };
        assert_eq!(err.to_string(), "RPC error -32000: filter not found");
    }
}
