//! SSZ shapes of the history-network content values.

use ssz::Encode;
use ssz_derive::{Decode, Encode};
use ssz_types::{typenum, VariableList};

use crate::domain::content_key::ContentType;
use crate::domain::errors::CodecError;

pub mod limits {
    /// Maximum transactions per block body.
    pub const MAX_TRANSACTION_COUNT: usize = 1 << 14;
    /// Maximum length of one encoded transaction.
    pub const MAX_TRANSACTION_LENGTH: usize = 1 << 24;
    /// Maximum length of the joined uncle-header list.
    pub const MAX_ENCODED_UNCLES_LENGTH: usize = 1 << 17;
    /// Maximum receipts per block.
    pub const MAX_RECEIPT_COUNT: usize = 1 << 14;
    /// Maximum length of one encoded receipt.
    pub const MAX_RECEIPT_LENGTH: usize = 1 << 27;
}

pub type EncodedTransaction = VariableList<u8, typenum::U16777216>;
pub type Transactions = VariableList<EncodedTransaction, typenum::U16384>;
pub type EncodedUncles = VariableList<u8, typenum::U131072>;
pub type EncodedReceipt = VariableList<u8, typenum::U134217728>;
pub type Receipts = VariableList<EncodedReceipt, typenum::U16384>;

/// Body container: canonical transaction encodings plus the RLP list of
/// uncle headers as one byte string.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BlockBody {
    pub transactions: Transactions,
    pub uncles: EncodedUncles,
}

fn bounded<T: Clone, N: typenum::Unsigned>(
    items: Vec<T>,
    what: &'static str,
    limit: usize,
) -> Result<VariableList<T, N>, CodecError> {
    let len = items.len();
    VariableList::new(items).map_err(|_| CodecError::LimitExceeded { what, len, limit })
}

impl BlockBody {
    pub fn new<T: AsRef<[u8]>>(transactions: &[T], uncles: &[u8]) -> Result<Self, CodecError> {
        let transactions = transactions
            .iter()
            .map(|tx| {
                bounded(
                    tx.as_ref().to_vec(),
                    "transaction",
                    limits::MAX_TRANSACTION_LENGTH,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transactions: bounded(
                transactions,
                "transaction list",
                limits::MAX_TRANSACTION_COUNT,
            )?,
            uncles: bounded(uncles.to_vec(), "uncles", limits::MAX_ENCODED_UNCLES_LENGTH)?,
        })
    }

    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.transactions.iter().map(|tx| tx.to_vec()).collect()
    }

    pub fn uncles(&self) -> &[u8] {
        &self.uncles
    }
}

pub(crate) fn receipts_list<T: AsRef<[u8]>>(receipts: &[T]) -> Result<Receipts, CodecError> {
    let items = receipts
        .iter()
        .map(|r| bounded(r.as_ref().to_vec(), "receipt", limits::MAX_RECEIPT_LENGTH))
        .collect::<Result<Vec<_>, _>>()?;
    bounded(items, "receipt list", limits::MAX_RECEIPT_COUNT)
}

/// A decoded content value, tagged by what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValue {
    Header(Vec<u8>),
    Body {
        transactions: Vec<Vec<u8>>,
        uncles: Vec<u8>,
    },
    Receipts(Vec<Vec<u8>>),
}

impl ContentValue {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentValue::Header(_) => ContentType::BlockHeader,
            ContentValue::Body { .. } => ContentType::BlockBody,
            ContentValue::Receipts(_) => ContentType::Receipts,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            ContentValue::Header(raw) => Ok(raw.clone()),
            ContentValue::Body {
                transactions,
                uncles,
            } => Ok(BlockBody::new(transactions, uncles)?.as_ssz_bytes()),
            ContentValue::Receipts(receipts) => Ok(receipts_list(receipts)?.as_ssz_bytes()),
        }
    }

    pub fn decode(content_type: ContentType, bytes: &[u8]) -> Result<Self, CodecError> {
        match content_type {
            ContentType::BlockHeader => Ok(ContentValue::Header(bytes.to_vec())),
            ContentType::BlockBody => {
                let (transactions, uncles) = crate::codec::decode_body_value(bytes)?;
                Ok(ContentValue::Body {
                    transactions,
                    uncles,
                })
            }
            ContentType::Receipts => Ok(ContentValue::Receipts(
                crate::codec::decode_receipts_value(bytes)?,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_layout() {
        let body = BlockBody::new::<Vec<u8>>(&[], &[0xc0]).unwrap();
        // Two offsets, no transactions, one uncle byte.
        assert_eq!(body.as_ssz_bytes(), vec![8, 0, 0, 0, 8, 0, 0, 0, 0xc0]);
    }

    #[test]
    fn test_body_offsets() {
        let body = BlockBody::new(&[vec![0xaa], vec![0xbb, 0xcc]], &[0xc0]).unwrap();
        assert_eq!(
            body.as_ssz_bytes(),
            vec![
                8, 0, 0, 0, // transactions offset
                19, 0, 0, 0, // uncles offset
                8, 0, 0, 0, 9, 0, 0, 0, // per-transaction offsets
                0xaa, 0xbb, 0xcc, // transactions
                0xc0, // uncles
            ]
        );
    }

    #[test]
    fn test_uncles_limit() {
        let oversized = vec![0u8; limits::MAX_ENCODED_UNCLES_LENGTH + 1];
        let err = BlockBody::new::<Vec<u8>>(&[], &oversized).unwrap_err();
        assert_eq!(
            err,
            CodecError::LimitExceeded {
                what: "uncles",
                len: limits::MAX_ENCODED_UNCLES_LENGTH + 1,
                limit: limits::MAX_ENCODED_UNCLES_LENGTH,
            }
        );
    }

    #[test]
    fn test_transaction_count_limit() {
        let txs = vec![vec![0x01]; limits::MAX_TRANSACTION_COUNT + 1];
        let err = BlockBody::new(&txs, &[0xc0]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                what: "transaction list",
                ..
            }
        ));
    }

    #[test]
    fn test_receipts_decode_rejects_garbage() {
        let err = ContentValue::decode(ContentType::Receipts, &[0x01, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_header_value_is_raw() {
        let value = ContentValue::Header(vec![0xf9, 0x02, 0x13]);
        assert_eq!(value.encode().unwrap(), vec![0xf9, 0x02, 0x13]);
        assert_eq!(value.content_type(), ContentType::BlockHeader);
    }
}
