//! `portal_historyOffer` over HTTP JSON-RPC.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{JsonRpcClient, RpcError};

use crate::domain::PropagationError;
use crate::ports::outbound::ContentEndpoint;

pub const OFFER_METHOD: &str = "portal_historyOffer";

/// A participant node reachable at a JSON-RPC URL.
pub struct JsonRpcEndpoint {
    client: JsonRpcClient,
}

impl JsonRpcEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PropagationError> {
        let url = url.into();
        let client =
            JsonRpcClient::new(url.clone(), timeout).map_err(|e| PropagationError::EndpointUnavailable {
                endpoint: url,
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn classify(&self, error: RpcError) -> PropagationError {
        let endpoint = self.client.url().to_string();
        if error.is_transient() {
            PropagationError::EndpointUnavailable {
                endpoint,
                reason: error.to_string(),
            }
        } else {
            PropagationError::Rpc {
                endpoint,
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ContentEndpoint for JsonRpcEndpoint {
    fn id(&self) -> &str {
        self.client.url()
    }

    async fn offer(&self, key_hex: &str, value_hex: &str) -> Result<u64, PropagationError> {
        self.client
            .call_required::<_, u64>(OFFER_METHOD, [key_hex, value_hex])
            .await
            .map_err(|e| self.classify(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transient() {
        let endpoint = JsonRpcEndpoint::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        assert_eq!(endpoint.id(), "http://127.0.0.1:1");
        let err = endpoint.offer("0x00", "0x").await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");
    }
}
