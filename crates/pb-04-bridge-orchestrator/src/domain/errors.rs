//! # Domain Errors
//!
//! Every failure a bridge run can hit, grouped by how it is handled:
//! transient errors are retried or re-subscribed locally, everything else
//! halts the affected block only.

use std::path::PathBuf;
use std::time::Duration;

use pb_01_canonical_encoding::EncodingError;
use pb_02_content_codec::CodecError;
use pb_03_content_propagation::PropagationError;
use shared_types::{Hash, RpcError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Header hash or a trie root did not verify.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Propagation(#[from] PropagationError),

    /// The new-block filter was dropped by the chain source.
    #[error("Block subscription dropped: {0}")]
    SubscriptionDropped(String),

    #[error("Chain source error: {0}")]
    ChainSource(String),

    #[error("Not found on chain source: {0}")]
    BlockNotFound(String),

    /// A receipt did not appear within the maximum wait.
    #[error("Receipt for transaction {transaction_hash:?} unavailable after {waited:?}")]
    ReceiptUnavailable {
        transaction_hash: Hash,
        waited: Duration,
    },

    #[error(
        "Receipts of block #{block_number} failed verification: {source}; {}",
        describe_archive(.preserved_at)
    )]
    ReceiptsMismatch {
        block_number: u64,
        source: EncodingError,
        /// Where the offending receipt encodings were written.
        preserved_at: Option<PathBuf>,
    },

    #[error("Invalid content file {path:?}: {reason}")]
    InvalidContentFile { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn describe_archive(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("see the file with invalid receipts at {}", path.display()),
        None => "invalid receipts could not be preserved".to_string(),
    }
}

impl BridgeError {
    /// Errors that may clear up on their own.
    pub fn is_transient(&self) -> bool {
        match self {
            BridgeError::SubscriptionDropped(_)
            | BridgeError::ChainSource(_)
            | BridgeError::ReceiptUnavailable { .. } => true,
            BridgeError::Propagation(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Hash or root disagreement on data reported by the chain source.
    pub fn is_verification_failure(&self) -> bool {
        match self {
            BridgeError::Encoding(e) => e.is_mismatch(),
            BridgeError::ReceiptsMismatch { .. } => true,
            _ => false,
        }
    }
}

impl From<RpcError> for BridgeError {
    fn from(error: RpcError) -> Self {
        BridgeError::ChainSource(error.to_string())
    }
}
