//! # Outbound Ports
//!
//! The network participant a content item is offered to.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::PropagationError;

/// A network participant exposing an "offer content" call.
///
/// Process lifecycle of the participant is outside this crate; an endpoint
/// is only a handle to an already-running node.
#[async_trait]
pub trait ContentEndpoint: Send + Sync {
    /// Stable identifier used as the key of push results.
    fn id(&self) -> &str;

    /// Offer hex-encoded content; returns how many peers it reached.
    async fn offer(&self, key_hex: &str, value_hex: &str) -> Result<u64, PropagationError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scripted endpoint for tests.
///
/// Responses are consumed in order; once exhausted, `fallback` is returned.
pub struct MockEndpoint {
    id: String,
    script: Mutex<VecDeque<Result<u64, PropagationError>>>,
    fallback: Result<u64, PropagationError>,
    offers: AtomicUsize,
    offered_keys: Mutex<Vec<String>>,
}

impl MockEndpoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(0),
            offers: AtomicUsize::new(0),
            offered_keys: Mutex::new(Vec::new()),
        }
    }

    /// Always report `peers` peers reached.
    pub fn reaching(id: impl Into<String>, peers: u64) -> Self {
        Self::new(id).with_fallback(Ok(peers))
    }

    /// Always fail with an error response.
    pub fn failing(id: impl Into<String>) -> Self {
        let id = id.into();
        let error = PropagationError::Rpc {
            endpoint: id.clone(),
            message: "Mock failure".to_string(),
        };
        Self::new(id).with_fallback(Err(error))
    }

    pub fn with_script<I>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = Result<u64, PropagationError>>,
    {
        self.script.lock().extend(responses);
        self
    }

    pub fn with_fallback(mut self, fallback: Result<u64, PropagationError>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn offer_count(&self) -> usize {
        self.offers.load(Ordering::SeqCst)
    }

    pub fn offered_keys(&self) -> Vec<String> {
        self.offered_keys.lock().clone()
    }
}

#[async_trait]
impl ContentEndpoint for MockEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    async fn offer(&self, key_hex: &str, _value_hex: &str) -> Result<u64, PropagationError> {
        self.offers.fetch_add(1, Ordering::SeqCst);
        self.offered_keys.lock().push(key_hex.to_string());
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
