use pb_02_content_codec::ContentKey;
use thiserror::Error;

/// Content propagation errors.
#[derive(Debug, Clone, Error)]
pub enum PropagationError {
    /// Endpoint could not be reached; may come up later.
    #[error("Endpoint {endpoint} unavailable: {reason}")]
    EndpointUnavailable { endpoint: String, reason: String },

    /// Endpoint answered the offer with an error.
    #[error("Endpoint {endpoint} rejected offer: {message}")]
    Rpc { endpoint: String, message: String },

    #[error("Content {key} reached {reached} peers, need {threshold}")]
    InsufficientPropagation {
        key: ContentKey,
        reached: u64,
        threshold: u64,
    },

    #[error("No content endpoints configured")]
    NoEndpoints,

    /// Two endpoints share an id; their results would collapse into one entry.
    #[error("Endpoint {endpoint} configured more than once")]
    DuplicateEndpoint { endpoint: String },

    #[error("Propagation cancelled with {remaining} items unsatisfied")]
    Cancelled { remaining: usize },
}

impl PropagationError {
    pub fn is_transient(&self) -> bool {
        matches!(self, PropagationError::EndpointUnavailable { .. })
    }
}
