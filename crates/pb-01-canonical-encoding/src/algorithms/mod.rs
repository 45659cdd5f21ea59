//! Hashing and Merkle-Patricia commitments.

pub mod nibbles;
pub mod ordered_trie;
pub mod verifier;

use sha3::{Digest, Keccak256};
use shared_types::{Hash, H256};

pub use ordered_trie::{ordered_trie_root, trie_root};
pub use verifier::TrieRootVerifier;

/// Root of a trie with no entries: keccak256(rlp("")).
pub const EMPTY_TRIE_ROOT: Hash = H256([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6,
    0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0,
    0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

/// keccak256 of an empty RLP list, the uncles hash of a block without uncles.
pub const EMPTY_UNCLES_HASH: Hash = H256([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a,
    0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13,
    0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    Hash::from_slice(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_constants() {
        assert_eq!(EMPTY_TRIE_ROOT, keccak256(&[0x80]));
        assert_eq!(EMPTY_UNCLES_HASH, keccak256(&[0xc0]));
    }

    #[test]
    fn test_keccak_empty_input() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
