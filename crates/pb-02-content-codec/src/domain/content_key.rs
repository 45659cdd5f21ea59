use std::fmt;

use shared_types::{encode_hex, Hash};

use crate::domain::errors::CodecError;

const HASH_LEN: usize = 32;
const CHAIN_ID_LEN: usize = 2;

/// The three content kinds a block contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ContentType {
    BlockHeader = 0x00,
    BlockBody = 0x01,
    Receipts = 0x02,
}

impl ContentType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0x00 => Ok(ContentType::BlockHeader),
            0x01 => Ok(ContentType::BlockBody),
            0x02 => Ok(ContentType::Receipts),
            other => Err(CodecError::UnknownContentType(other)),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentType::BlockHeader => "header",
            ContentType::BlockBody => "body",
            ContentType::Receipts => "receipts",
        };
        f.write_str(name)
    }
}

/// Unique address of one datum of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey {
    pub content_type: ContentType,
    pub chain_id: Option<u16>,
    pub block_hash: Hash,
}

impl ContentKey {
    pub fn new(content_type: ContentType, block_hash: Hash) -> Self {
        Self {
            content_type,
            chain_id: None,
            block_hash,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u16) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CHAIN_ID_LEN + HASH_LEN);
        out.push(self.content_type.tag());
        if let Some(chain_id) = self.chain_id {
            out.extend_from_slice(&chain_id.to_le_bytes());
        }
        out.extend_from_slice(self.block_hash.as_bytes());
        out
    }

    /// Parse a key; the chain-id field is present exactly when the key is
    /// 35 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or(CodecError::InvalidContentKey { len: 0 })?;

        let (chain_id, hash) = match rest.len() {
            HASH_LEN => (None, rest),
            n if n == CHAIN_ID_LEN + HASH_LEN => (
                Some(u16::from_le_bytes([rest[0], rest[1]])),
                &rest[CHAIN_ID_LEN..],
            ),
            _ => return Err(CodecError::InvalidContentKey { len: bytes.len() }),
        };

        Ok(Self {
            content_type: ContentType::from_tag(tag)?,
            chain_id,
            block_hash: Hash::from_slice(hash),
        })
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.to_bytes())
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
