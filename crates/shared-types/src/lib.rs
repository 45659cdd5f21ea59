//! # Shared Types Crate
//!
//! Types that cross subsystem boundaries of the bridge.
//!
//! ## Contents
//!
//! - **entities**: web3-shaped chain data (`BlockFields`, `TransactionFields`,
//!   `ReceiptFields`) as returned by a full-transaction block query.
//! - **jsonrpc**: JSON-RPC 2.0 envelopes and the HTTP client used both to read
//!   the chain and to offer content to network participants.
//! - **errors**: transport error classification.
//!
//! ## Design Principles
//!
//! - **Immutable snapshots**: entities are plain data, cloned rather than shared.
//! - **Wire fidelity**: field names follow the web3 JSON names so that a block
//!   deserialises without any intermediate mapping.

pub mod entities;
pub mod errors;
pub mod jsonrpc;

pub use entities::*;
pub use errors::*;
pub use jsonrpc::{JsonRpcClient, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse hex with or without a `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
}
