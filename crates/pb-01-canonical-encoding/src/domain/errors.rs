use std::fmt;

use shared_types::Hash;
use thiserror::Error;

/// Which commitment a computed root was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Transactions,
    Receipts,
    Uncles,
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RootKind::Transactions => "transactions",
            RootKind::Receipts => "receipts",
            RootKind::Uncles => "uncles",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The canonical header encoding does not hash to the advertised hash.
    #[error("Header encoding mismatch: advertised {expected:?}, computed {actual:?}")]
    EncodingMismatch { expected: Hash, actual: Hash },

    #[error("{kind} root mismatch: expected {expected:?}, computed {actual:?}")]
    RootMismatch {
        kind: RootKind,
        expected: Hash,
        actual: Hash,
    },

    #[error("Unsupported transaction type {tx_type} at block {block_number}")]
    UnsupportedTransactionType { tx_type: u64, block_number: u64 },

    #[error("Missing field {field} for {record}")]
    MissingField {
        field: &'static str,
        record: &'static str,
    },

    #[error("Receipt {transaction_hash:?} has neither status nor state root")]
    MalformedStatus { transaction_hash: Hash },
}

impl EncodingError {
    /// Hash or root disagreement, as opposed to unusable input.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            EncodingError::EncodingMismatch { .. } | EncodingError::RootMismatch { .. }
        )
    }
}
