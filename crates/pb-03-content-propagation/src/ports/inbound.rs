//! Inbound port (API) for content propagation.

use async_trait::async_trait;

use crate::domain::{ContentItem, PushResult};

/// What the orchestrator needs from the propagation layer.
#[async_trait]
pub trait ContentPropagationApi: Send + Sync {
    /// Offer `item` once to every endpoint.
    ///
    /// The result holds one entry per configured endpoint; unreachable or
    /// failing endpoints report 0.
    async fn push(&self, item: &ContentItem) -> PushResult;
}
