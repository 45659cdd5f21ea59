//! # pb-01-canonical-encoding
//!
//! Deterministic byte encodings of execution-chain records and the
//! commitments that prove them.
//!
//! ## Role in System
//!
//! - **First stage of every block**: the orchestrator hands raw web3 field
//!   sets to [`CanonicalEncoder`] and gets back the exact bytes the network
//!   stores.
//! - **Self-verifying**: a header encoding is only returned when it hashes to
//!   the advertised block hash; transaction, receipt and uncle sequences are
//!   checked against the roots committed in that header by
//!   [`TrieRootVerifier`].
//!
//! ## Data Flow
//!
//! ```text
//! BlockFields ──encode_header──→ header RLP ──keccak──→ == block.hash ?
//!      │
//!      ├─ transactions ──encode_transaction──→ [tx bytes] ──ordered_trie_root──→ == transactions_root ?
//!      ├─ uncles ────────encode_header───────→ rlp list   ──keccak─────────────→ == uncles_hash ?
//!      └─ receipts ──────encode_receipt──────→ [rc bytes] ──ordered_trie_root──→ == receipts_root ?
//! ```

pub mod algorithms;
pub mod domain;
pub mod encoder;

pub use algorithms::{
    keccak256, ordered_trie_root, trie_root, TrieRootVerifier, EMPTY_TRIE_ROOT, EMPTY_UNCLES_HASH,
};
pub use domain::*;
pub use encoder::CanonicalEncoder;
