//! # JSON-RPC 2.0 Transport
//!
//! A small HTTP client for JSON-RPC endpoints. Both the chain source and the
//! content endpoints speak this protocol, so the envelope types and the
//! request loop live here once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::RpcError;

/// Default connect timeout for every endpoint.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<T> {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: T,
    pub id: u64,
}

impl<T> JsonRpcRequest<T> {
    pub fn new(method: impl Into<String>, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response structure.
///
/// `result` is `None` both when absent and when explicitly `null`; several
/// methods use `null` to mean "not known yet".
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default = "none")]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

fn none<T>() -> Option<T> {
    None
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC Error {}: {}", self.code, self.message)
    }
}

/// HTTP JSON-RPC client bound to one endpoint URL.
pub struct JsonRpcClient {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a client with the given overall request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(RpcError::Http)?;

        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a method whose result may legitimately be `null`.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, RpcError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());
        trace!(url = %self.url, method, id = request.id, "JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcError::Connection(format!("Cannot connect to {}", self.url))
                } else {
                    RpcError::Http(e)
                }
            })?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| RpcError::Parse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result)
    }

    /// Call a method that must return a non-null result.
    pub async fn call_required<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        self.call(method, params)
            .await?
            .ok_or_else(|| RpcError::Parse(format!("Missing result for {method}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest::new("portal_historyOffer", ["0x00", "0x01"], 7);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "portal_historyOffer",
                "params": ["0x00", "0x01"],
                "id": 7
            })
        );
    }

    #[test]
    fn test_null_result_is_none() {
        let response: JsonRpcResponse<u64> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.result.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response() {
        let response: JsonRpcResponse<u64> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":"a","error":{"code":-32000,"message":"no peers"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(error.to_string(), "RPC Error -32000: no peers");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let client = JsonRpcClient::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let err = client
            .call::<_, u64>("eth_blockNumber", [(); 0])
            .await
            .unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");
    }
}
