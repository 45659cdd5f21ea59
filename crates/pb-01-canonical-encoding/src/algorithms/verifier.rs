//! Cross-checks of encoded sequences against header commitments.

use rlp::RlpStream;
use shared_types::Hash;
use tracing::debug;

use super::{keccak256, ordered_trie_root};
use crate::domain::errors::{EncodingError, RootKind};

/// Stateless verifier for ordered-sequence commitments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrieRootVerifier;

impl TrieRootVerifier {
    /// Index-keyed trie root of `items` in the given order.
    pub fn compute_root<T: AsRef<[u8]>>(items: &[T]) -> Hash {
        ordered_trie_root(items)
    }

    /// Check that `items` commit to `expected`; returns the computed root.
    ///
    /// `kind` selects the commitment scheme: transactions and receipts use
    /// the ordered trie, uncles use keccak256 of the RLP list.
    pub fn verify<T: AsRef<[u8]>>(
        kind: RootKind,
        items: &[T],
        expected: Hash,
    ) -> Result<Hash, EncodingError> {
        let actual = match kind {
            RootKind::Transactions | RootKind::Receipts => ordered_trie_root(items),
            RootKind::Uncles => keccak256(&uncle_list(items)),
        };

        if actual != expected {
            debug!(%kind, ?expected, ?actual, count = items.len(), "Root mismatch");
            return Err(EncodingError::RootMismatch {
                kind,
                expected,
                actual,
            });
        }
        Ok(actual)
    }

    /// Verify uncle header encodings against `uncles_hash` and return the
    /// joined RLP list that becomes the body's uncles field.
    pub fn verify_uncles<T: AsRef<[u8]>>(
        uncle_headers: &[T],
        uncles_hash: Hash,
    ) -> Result<Vec<u8>, EncodingError> {
        let joined = uncle_list(uncle_headers);
        let actual = keccak256(&joined);
        if actual != uncles_hash {
            return Err(EncodingError::RootMismatch {
                kind: RootKind::Uncles,
                expected: uncles_hash,
                actual,
            });
        }
        Ok(joined)
    }
}

/// RLP list whose items are the already-encoded uncle headers.
pub fn uncle_list<T: AsRef<[u8]>>(uncle_headers: &[T]) -> Vec<u8> {
    let mut s = RlpStream::new_list(uncle_headers.len());
    for header in uncle_headers {
        s.append_raw(header.as_ref(), 1);
    }
    s.out().to_vec()
}
