//! Content keys and values compared byte-for-byte with published vectors.

use pb_02_content_codec::{
    body_value, decode_body_value, decode_receipts_value, receipts_value, ContentKey,
    ContentKeyCodec, ContentType, ContentValue,
};
use serde::Deserialize;
use shared_types::{decode_hex, encode_hex, Hash};

const VECTOR_HASH: &str = "0xd1c390624d3bd4e409a61a858e5dcc5517729a9170d014a6c96530d64dd8621d";

#[derive(Deserialize)]
struct SyntheticBlock {
    expected: Expected,
}

#[derive(Deserialize)]
struct Expected {
    uncles_rlp: String,
    transactions: Vec<String>,
    receipts: Vec<String>,
    body_value: String,
    receipts_value: String,
    header_key: String,
    body_key: String,
    receipts_key: String,
}

fn synthetic() -> Expected {
    let block: SyntheticBlock = serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/synthetic_block.json"
    )))
    .unwrap();
    block.expected
}

fn bytes(hex_str: &str) -> Vec<u8> {
    decode_hex(hex_str).unwrap()
}

fn hash(hex_str: &str) -> Hash {
    Hash::from_slice(&bytes(hex_str))
}

#[test]
fn test_chain_id_keys_match_published_vectors() {
    let block_hash = hash(VECTOR_HASH);
    let cases = [
        (15u16, ContentType::BlockHeader, "0x000f00"),
        (20, ContentType::BlockBody, "0x011400"),
        (4, ContentType::Receipts, "0x020400"),
    ];
    for (chain_id, content_type, prefix) in cases {
        let key = ContentKeyCodec::new(Some(chain_id)).key(content_type, block_hash);
        assert_eq!(key.to_hex(), format!("{prefix}{}", &VECTOR_HASH[2..]));
    }
}

#[test]
fn test_plain_keys_for_mainnet_block() {
    let codec = ContentKeyCodec::default();
    let block_hash = hash("0x720704f3aa11c53cf344ea069db95cecb81ad7453c8f276b2a1062979611f09c");
    assert_eq!(
        codec.body_key(block_hash).to_hex(),
        "0x01720704f3aa11c53cf344ea069db95cecb81ad7453c8f276b2a1062979611f09c"
    );
    assert_eq!(
        codec.receipts_key(block_hash).to_hex(),
        "0x02720704f3aa11c53cf344ea069db95cecb81ad7453c8f276b2a1062979611f09c"
    );
}

#[test]
fn test_parsed_key_matches_built_key() {
    let expected = synthetic();
    for key_hex in [&expected.header_key, &expected.body_key, &expected.receipts_key] {
        let key = ContentKey::from_bytes(&bytes(key_hex)).unwrap();
        assert_eq!(&key.to_hex(), key_hex);
        assert_eq!(key.chain_id, None);
    }
}

#[test]
fn test_body_value_matches_fixture() {
    let expected = synthetic();
    let transactions: Vec<Vec<u8>> = expected.transactions.iter().map(|t| bytes(t)).collect();
    let uncles = bytes(&expected.uncles_rlp);

    let value = body_value(&transactions, &uncles).unwrap();
    assert_eq!(value, bytes(&expected.body_value));

    let (decoded_txs, decoded_uncles) = decode_body_value(&value).unwrap();
    assert_eq!(decoded_txs, transactions);
    assert_eq!(decoded_uncles, uncles);
}

#[test]
fn test_receipts_value_matches_fixture() {
    let expected = synthetic();
    let receipts: Vec<Vec<u8>> = expected.receipts.iter().map(|r| bytes(r)).collect();

    let value = receipts_value(&receipts).unwrap();
    assert_eq!(value, bytes(&expected.receipts_value));
    assert_eq!(decode_receipts_value(&value).unwrap(), receipts);
}

/// SSZ `List[ByteList]`: one little-endian u32 offset per element, then the
/// concatenated elements.
fn ssz_byte_lists(items: &[Vec<u8>]) -> Vec<u8> {
    let mut offset = 4 * items.len();
    let mut out = Vec::new();
    for item in items {
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += item.len();
    }
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// SSZ `Container(List[ByteList], ByteList)`: two offsets, then both fields.
fn ssz_block_body(transactions: &[Vec<u8>], uncles: &[u8]) -> Vec<u8> {
    let list = ssz_byte_lists(transactions);
    let mut out = Vec::new();
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&((8 + list.len()) as u32).to_le_bytes());
    out.extend_from_slice(&list);
    out.extend_from_slice(uncles);
    out
}

#[test]
fn test_empty_body_layout() {
    let value = body_value::<Vec<u8>>(&[], &[0xc0]).unwrap();
    assert_eq!(encode_hex(&value), "0x0800000008000000c0");
    assert_eq!(encode_hex(&receipts_value::<Vec<u8>>(&[]).unwrap()), "0x");
}

#[test]
fn test_body_value_follows_ssz_layout() {
    let expected = synthetic();
    let transactions: Vec<Vec<u8>> = expected.transactions.iter().map(|t| bytes(t)).collect();
    let uncles = bytes(&expected.uncles_rlp);

    let value = body_value(&transactions, &uncles).unwrap();
    assert_eq!(value, ssz_block_body(&transactions, &uncles));
    assert_eq!(&value[..4], &[8, 0, 0, 0]);
}

#[test]
fn test_receipts_value_follows_ssz_layout() {
    let expected = synthetic();
    let receipts: Vec<Vec<u8>> = expected.receipts.iter().map(|r| bytes(r)).collect();

    let value = receipts_value(&receipts).unwrap();
    assert_eq!(value, ssz_byte_lists(&receipts));
    let first_offset = u32::from_le_bytes([value[0], value[1], value[2], value[3]]);
    assert_eq!(first_offset as usize, 4 * receipts.len());
}

#[test]
fn test_content_value_dispatch() {
    let expected = synthetic();
    let value = ContentValue::decode(ContentType::BlockBody, &bytes(&expected.body_value)).unwrap();
    assert_eq!(value.content_type(), ContentType::BlockBody);
    assert_eq!(value.encode().unwrap(), bytes(&expected.body_value));
}
