//! Any single-byte change to a supplied hash or root must be detected.

use pb_01_canonical_encoding::{CanonicalEncoder, RootKind, TrieRootVerifier};
use proptest::prelude::*;
use serde::Deserialize;
use shared_types::{BlockFields, Hash, ReceiptFields};

#[derive(Deserialize)]
struct SyntheticBlock {
    block: BlockFields,
    uncles: Vec<BlockFields>,
    receipts: Vec<ReceiptFields>,
}

fn synthetic() -> SyntheticBlock {
    serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/synthetic_block.json"
    ))).unwrap()
}

fn mutate(hash: Hash, index: usize, xor: u8) -> Hash {
    let mut bytes = hash.to_fixed_bytes();
    bytes[index] ^= xor;
    Hash::from(bytes)
}

proptest! {
    #[test]
    fn mutated_block_hash_is_rejected(index in 0usize..32, xor in 1u8..=255) {
        let mut block = synthetic().block;
        block.hash = mutate(block.hash, index, xor);
        prop_assert!(CanonicalEncoder::default().encode_header(&block).is_err());
    }

    #[test]
    fn mutated_transactions_root_is_rejected(index in 0usize..32, xor in 1u8..=255) {
        let fixture = synthetic();
        let encoder = CanonicalEncoder::default();
        let number = fixture.block.block_number();
        let encoded: Vec<Vec<u8>> = fixture.block.transactions.iter()
            .map(|tx| encoder.encode_transaction(tx, number).unwrap())
            .collect();
        let wrong = mutate(fixture.block.transactions_root, index, xor);
        prop_assert!(TrieRootVerifier::verify(RootKind::Transactions, &encoded, wrong).is_err());
    }

    #[test]
    fn mutated_receipts_root_is_rejected(index in 0usize..32, xor in 1u8..=255) {
        let fixture = synthetic();
        let encoder = CanonicalEncoder::default();
        let number = fixture.block.block_number();
        let encoded: Vec<Vec<u8>> = fixture.receipts.iter()
            .map(|r| encoder.encode_receipt(r, number).unwrap())
            .collect();
        let wrong = mutate(fixture.block.receipts_root, index, xor);
        prop_assert!(TrieRootVerifier::verify(RootKind::Receipts, &encoded, wrong).is_err());
    }

    #[test]
    fn mutated_uncles_hash_is_rejected(index in 0usize..32, xor in 1u8..=255) {
        let fixture = synthetic();
        let encoder = CanonicalEncoder::default();
        let uncles: Vec<Vec<u8>> = fixture.uncles.iter()
            .map(|u| encoder.encode_header(u).unwrap())
            .collect();
        let wrong = mutate(fixture.block.uncles_hash, index, xor);
        prop_assert!(TrieRootVerifier::verify_uncles(&uncles, wrong).is_err());
    }

    #[test]
    fn mutated_header_field_is_rejected(index in 0usize..32, xor in 1u8..=255) {
        let mut block = synthetic().block;
        block.state_root = mutate(block.state_root, index, xor);
        prop_assert!(CanonicalEncoder::default().encode_header(&block).is_err());
    }
}
