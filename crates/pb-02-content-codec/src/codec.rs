//! Builders for the (key, value) pairs of one block.

use shared_types::Hash;
use ssz::{Decode, Encode};

use crate::domain::content_value::{receipts_list, Receipts};
use crate::domain::{BlockBody, CodecError, ContentKey, ContentType};

/// Builds content keys in one fixed layout.
///
/// The default layout carries no chain id. With a chain id configured the
/// id is written as a little-endian `u16` directly after the type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentKeyCodec {
    chain_id: Option<u16>,
}

impl ContentKeyCodec {
    pub fn new(chain_id: Option<u16>) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> Option<u16> {
        self.chain_id
    }

    pub fn key(&self, content_type: ContentType, block_hash: Hash) -> ContentKey {
        let key = ContentKey::new(content_type, block_hash);
        match self.chain_id {
            Some(chain_id) => key.with_chain_id(chain_id),
            None => key,
        }
    }

    pub fn header_key(&self, block_hash: Hash) -> ContentKey {
        self.key(ContentType::BlockHeader, block_hash)
    }

    pub fn body_key(&self, block_hash: Hash) -> ContentKey {
        self.key(ContentType::BlockBody, block_hash)
    }

    pub fn receipts_key(&self, block_hash: Hash) -> ContentKey {
        self.key(ContentType::Receipts, block_hash)
    }
}

/// SSZ body value from transaction encodings and the joined uncle list.
pub fn body_value<T: AsRef<[u8]>>(transactions: &[T], uncles: &[u8]) -> Result<Vec<u8>, CodecError> {
    Ok(BlockBody::new(transactions, uncles)?.as_ssz_bytes())
}

/// SSZ receipts value from receipt encodings in block order.
pub fn receipts_value<T: AsRef<[u8]>>(receipts: &[T]) -> Result<Vec<u8>, CodecError> {
    Ok(receipts_list(receipts)?.as_ssz_bytes())
}

/// Inverse of [`body_value`]: (transactions, uncles).
pub fn decode_body_value(bytes: &[u8]) -> Result<(Vec<Vec<u8>>, Vec<u8>), CodecError> {
    let body =
        BlockBody::from_ssz_bytes(bytes).map_err(|e| CodecError::Decode(format!("{e:?}")))?;
    Ok((body.transactions(), body.uncles().to_vec()))
}

/// Inverse of [`receipts_value`].
pub fn decode_receipts_value(bytes: &[u8]) -> Result<Vec<Vec<u8>>, CodecError> {
    let receipts =
        Receipts::from_ssz_bytes(bytes).map_err(|e| CodecError::Decode(format!("{e:?}")))?;
    Ok(receipts.iter().map(|r| r.to_vec()).collect())
}
