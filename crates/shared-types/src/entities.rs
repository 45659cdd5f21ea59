//! # Chain Data Entities
//!
//! Immutable snapshots of execution-chain data as reported by a web3 JSON-RPC
//! source. Field names mirror the JSON names (`parentHash`, `sha3Uncles`, ...)
//! so a `eth_getBlockByHash(hash, true)` result deserialises directly.
//!
//! ## Clusters
//!
//! - **Block**: `BlockFields` (header fields + full transactions + uncle hashes)
//! - **Transaction**: `TransactionFields`, `AccessListItem`
//! - **Receipt**: `ReceiptFields`, `LogFields`

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use ethereum_types::{Bloom, H160, H256, H64, U256, U64};

/// A 32-byte Keccak-256 digest.
pub type Hash = H256;

/// A 20-byte account address.
pub type Address = H160;

// =============================================================================
// HEX BYTES
// =============================================================================

/// Variable-length byte string, serialised as `0x`-prefixed hex.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::encode_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        crate::decode_hex(&value)
            .map(Bytes)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex bytes {value:?}: {e}")))
    }
}

// =============================================================================
// CLUSTER A: BLOCKS
// =============================================================================

/// A block as returned by a full-transaction block query.
///
/// For uncle headers (`eth_getUncleByBlockHashAndIndex`) the `transactions`
/// and `uncles` lists are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFields {
    /// Advertised block hash; the canonical header encoding must hash to it.
    pub hash: Hash,
    pub number: U64,
    pub parent_hash: Hash,
    #[serde(rename = "sha3Uncles")]
    pub uncles_hash: Hash,
    #[serde(rename = "miner")]
    pub coinbase: Address,
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    pub gas_limit: U256,
    pub gas_used: U256,
    pub timestamp: U256,
    pub extra_data: Bytes,
    pub mix_hash: Hash,
    pub nonce: H64,
    /// Present from London onwards; selects the base-fee header shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U256>,
    #[serde(default)]
    pub transactions: Vec<TransactionFields>,
    #[serde(default)]
    pub uncles: Vec<Hash>,
}

impl BlockFields {
    /// Block number as a native integer.
    pub fn block_number(&self) -> u64 {
        self.number.as_u64()
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// A signed transaction as reported inside a full block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    /// Advertised transaction hash (informational; receipts are looked up by
    /// the hash of the canonical encoding).
    #[serde(default)]
    pub hash: Option<Hash>,
    /// Envelope type; absent on pre-Berlin sources and treated as legacy.
    #[serde(rename = "type", default)]
    pub tx_type: Option<U64>,
    #[serde(default)]
    pub chain_id: Option<U64>,
    pub nonce: U256,
    #[serde(default)]
    pub gas_price: Option<U256>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(default)]
    pub max_fee_per_gas: Option<U256>,
    pub gas: U256,
    /// `None` for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    #[serde(default)]
    pub access_list: Option<Vec<AccessListItem>>,
    pub v: U64,
    pub r: U256,
    pub s: U256,
}

/// One EIP-2930 access list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<H256>,
}

// =============================================================================
// CLUSTER C: RECEIPTS
// =============================================================================

/// A transaction receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFields {
    pub transaction_hash: Hash,
    #[serde(rename = "type", default)]
    pub tx_type: Option<U64>,
    /// Post-Byzantium outcome: 0 (failure) or 1 (success).
    #[serde(default)]
    pub status: Option<U64>,
    /// Pre-Byzantium intermediate state root.
    #[serde(default)]
    pub root: Option<Hash>,
    pub cumulative_gas_used: U256,
    pub logs_bloom: Bloom,
    pub logs: Vec<LogFields>,
}

impl ReceiptFields {
    /// Tri-state outcome value: the status when present, otherwise the
    /// numeric value of the intermediate state root.
    pub fn outcome(&self) -> Option<U256> {
        match (self.status, self.root) {
            (Some(status), _) => Some(U256::from(status.as_u64())),
            (None, Some(root)) => Some(U256::from_big_endian(root.as_bytes())),
            (None, None) => None,
        }
    }
}

/// A single emitted log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFields {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}
