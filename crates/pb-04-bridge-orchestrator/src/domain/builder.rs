//! Content items derived from verified chain data.

use pb_01_canonical_encoding::{
    CanonicalEncoder, CanonicalTransaction, RootKind, TrieRootVerifier,
};
use pb_02_content_codec::{body_value, receipts_value, ContentKeyCodec};
use pb_03_content_propagation::ContentItem;
use shared_types::{BlockFields, ReceiptFields};

use super::errors::BridgeError;

/// Turns one block's records into header, body and receipts content.
///
/// Every item is built only after the data behind it verified against the
/// block's own commitments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentBuilder {
    encoder: CanonicalEncoder,
    keys: ContentKeyCodec,
}

impl ContentBuilder {
    pub fn new(encoder: CanonicalEncoder, keys: ContentKeyCodec) -> Self {
        Self { encoder, keys }
    }

    pub fn encoder(&self) -> &CanonicalEncoder {
        &self.encoder
    }

    /// Header content; the encoding must hash to `block.hash`.
    pub fn header(&self, block: &BlockFields) -> Result<ContentItem, BridgeError> {
        let header = self.encoder.encode_header(block)?;
        Ok(ContentItem::new(self.keys.header_key(block.hash), header).for_block(block.block_number()))
    }

    /// Canonical transactions, checked against `transactions_root`.
    pub fn transactions(&self, block: &BlockFields) -> Result<Vec<CanonicalTransaction>, BridgeError> {
        let number = block.block_number();
        let transactions = block
            .transactions
            .iter()
            .map(|tx| self.encoder.canonical_transaction(tx, number))
            .collect::<Result<Vec<_>, _>>()?;

        let encoded: Vec<&[u8]> = transactions.iter().map(CanonicalTransaction::as_bytes).collect();
        TrieRootVerifier::verify(RootKind::Transactions, &encoded, block.transactions_root)?;
        Ok(transactions)
    }

    /// Body content from verified transactions and the block's uncle
    /// headers, in uncle-index order.
    pub fn body(
        &self,
        block: &BlockFields,
        transactions: &[CanonicalTransaction],
        uncles: &[BlockFields],
    ) -> Result<ContentItem, BridgeError> {
        let uncle_headers = uncles
            .iter()
            .map(|uncle| self.encoder.encode_header(uncle))
            .collect::<Result<Vec<_>, _>>()?;
        let joined_uncles = TrieRootVerifier::verify_uncles(&uncle_headers, block.uncles_hash)?;

        let encoded: Vec<&[u8]> = transactions.iter().map(CanonicalTransaction::as_bytes).collect();
        let value = body_value(&encoded, &joined_uncles)?;
        Ok(ContentItem::new(self.keys.body_key(block.hash), value).for_block(block.block_number()))
    }

    /// Receipt encodings in transaction order, not yet verified.
    pub fn encode_receipts(
        &self,
        block: &BlockFields,
        receipts: &[ReceiptFields],
    ) -> Result<Vec<Vec<u8>>, BridgeError> {
        let number = block.block_number();
        receipts
            .iter()
            .map(|receipt| self.encoder.encode_receipt(receipt, number).map_err(BridgeError::from))
            .collect()
    }

    /// Receipts content; the encodings must commit to `receipts_root`.
    pub fn receipts(&self, block: &BlockFields, encoded: &[Vec<u8>]) -> Result<ContentItem, BridgeError> {
        TrieRootVerifier::verify(RootKind::Receipts, encoded, block.receipts_root)?;
        let value = receipts_value(encoded)?;
        Ok(ContentItem::new(self.keys.receipts_key(block.hash), value).for_block(block.block_number()))
    }
}
