//! Fan-out of one content item to every endpoint.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{ContentItem, PropagationConfig, PropagationError, PushResult};
use crate::ports::inbound::ContentPropagationApi;
use crate::ports::outbound::ContentEndpoint;

/// Offers content to a fixed set of endpoints.
///
/// Every endpoint is contacted at most once per logical push. Endpoints are
/// offered concurrently; a failing endpoint never aborts the others.
pub struct PropagationClient {
    endpoints: Vec<Arc<dyn ContentEndpoint>>,
    config: PropagationConfig,
}

impl PropagationClient {
    pub fn new(
        endpoints: Vec<Arc<dyn ContentEndpoint>>,
        config: PropagationConfig,
    ) -> Result<Self, PropagationError> {
        if endpoints.is_empty() {
            return Err(PropagationError::NoEndpoints);
        }
        let mut seen = HashSet::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            if !seen.insert(endpoint.id()) {
                return Err(PropagationError::DuplicateEndpoint {
                    endpoint: endpoint.id().to_string(),
                });
            }
        }
        Ok(Self { endpoints, config })
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    pub fn endpoint_ids(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.id().to_string()).collect()
    }

    /// Offer to one endpoint, polling while it is still coming up.
    async fn offer_to(&self, endpoint: &dyn ContentEndpoint, key_hex: &str, value_hex: &str) -> u64 {
        let attempts = self.config.startup_poll_attempts.max(1);
        for attempt in 1..=attempts {
            match endpoint.offer(key_hex, value_hex).await {
                Ok(peers_reached) => return peers_reached,
                Err(e) if e.is_transient() && attempt < attempts => {
                    debug!(
                        endpoint = endpoint.id(),
                        attempt,
                        error = %e,
                        "Endpoint not ready, polling"
                    );
                    tokio::time::sleep(self.config.startup_poll_interval).await;
                }
                Err(e) => {
                    warn!(endpoint = endpoint.id(), error = %e, "Offer failed, counting 0 peers");
                    return 0;
                }
            }
        }
        0
    }
}

#[async_trait]
impl ContentPropagationApi for PropagationClient {
    async fn push(&self, item: &ContentItem) -> PushResult {
        let key_hex = item.key_hex();
        let value_hex = item.value_hex();

        info!(
            content_key = %key_hex,
            content_type = %item.content_type(),
            block_number = ?item.block_number,
            value = %item.value_preview(),
            "Propagate new history content"
        );

        let offers = self.endpoints.iter().map(|endpoint| {
            let key_hex = key_hex.as_str();
            let value_hex = value_hex.as_str();
            async move {
                let peers_reached = self.offer_to(endpoint.as_ref(), key_hex, value_hex).await;
                (endpoint.id().to_string(), peers_reached)
            }
        });
        let result: PushResult = join_all(offers).await.into_iter().collect();

        for (endpoint, peers_reached) in result.iter() {
            debug!(content_key = %key_hex, endpoint, peers_reached, "Offer result");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockEndpoint;
    use pb_02_content_codec::{ContentKey, ContentType};
    use shared_types::Hash;

    fn item() -> ContentItem {
        ContentItem::new(
            ContentKey::new(ContentType::BlockHeader, Hash::repeat_byte(0x48)),
            vec![0xc0],
        )
    }

    #[test]
    fn test_requires_endpoints() {
        assert!(matches!(
            PropagationClient::new(vec![], PropagationConfig::for_testing()),
            Err(PropagationError::NoEndpoints)
        ));
    }

    #[test]
    fn test_rejects_repeated_endpoint_ids() {
        let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![
            Arc::new(MockEndpoint::reaching("http://n:8545", 2)),
            Arc::new(MockEndpoint::reaching("http://m:8545", 1)),
            Arc::new(MockEndpoint::reaching("http://n:8545", 0)),
        ];
        match PropagationClient::new(endpoints, PropagationConfig::for_testing()) {
            Err(PropagationError::DuplicateEndpoint { endpoint }) => {
                assert_eq!(endpoint, "http://n:8545")
            }
            other => panic!("expected duplicate endpoint error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_one_entry_per_endpoint() {
        let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![
            Arc::new(MockEndpoint::reaching("http://n:8545", 2)),
            Arc::new(MockEndpoint::reaching("http://n:8546", 0)),
        ];
        let client = PropagationClient::new(endpoints, PropagationConfig::for_testing()).unwrap();

        let result = client.push(&item()).await;
        assert_eq!(result.len(), client.endpoint_ids().len());
        assert_eq!(result.max_peers(), 2);
    }

    #[tokio::test]
    async fn test_partial_endpoint_failure() {
        let a = Arc::new(MockEndpoint::reaching("a", 4));
        let b = Arc::new(MockEndpoint::failing("b"));
        let c = Arc::new(MockEndpoint::reaching("c", 1));
        let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![a.clone(), b.clone(), c.clone()];
        let client = PropagationClient::new(endpoints, PropagationConfig::for_testing()).unwrap();

        let result = client.push(&item()).await;
        assert_eq!(result.len(), 3);
        assert_eq!(result.get("a"), Some(4));
        assert_eq!(result.get("b"), Some(0));
        assert_eq!(result.get("c"), Some(1));
        assert_eq!(result.max_peers(), 4);

        // Error responses are not retried within a push.
        assert_eq!(b.offer_count(), 1);
        assert_eq!(a.offer_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_polling_recovers() {
        let unavailable = || PropagationError::EndpointUnavailable {
            endpoint: "slow".into(),
            reason: "connection refused".into(),
        };
        let slow = Arc::new(
            MockEndpoint::reaching("slow", 6).with_script([Err(unavailable()), Err(unavailable())]),
        );
        let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![slow.clone()];
        let client = PropagationClient::new(endpoints, PropagationConfig::for_testing()).unwrap();

        let result = client.push(&item()).await;
        assert_eq!(result.get("slow"), Some(6));
        assert_eq!(slow.offer_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_polling_is_bounded() {
        let down = Arc::new(MockEndpoint::new("down").with_fallback(Err(
            PropagationError::EndpointUnavailable {
                endpoint: "down".into(),
                reason: "connection refused".into(),
            },
        )));
        let up = Arc::new(MockEndpoint::reaching("up", 2));
        let config = PropagationConfig::for_testing();
        let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![down.clone(), up.clone()];
        let client = PropagationClient::new(endpoints, config.clone()).unwrap();

        let result = client.push(&item()).await;
        assert_eq!(result.get("down"), Some(0));
        assert_eq!(result.get("up"), Some(2));
        assert_eq!(down.offer_count(), config.startup_poll_attempts as usize);
    }
}
