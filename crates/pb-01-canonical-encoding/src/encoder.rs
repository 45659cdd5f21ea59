//! Entry point for turning web3 field sets into canonical bytes.

use shared_types::{BlockFields, ReceiptFields, TransactionFields};
use tracing::warn;

use crate::domain::{
    CanonicalHeader, CanonicalReceipt, CanonicalTransaction, EncodingError, ForkSchedule,
    TransactionType,
};

/// Pure encoder for headers, transactions and receipts.
///
/// The fork schedule decides which typed envelopes are legal at a given
/// height; everything else is fixed by the record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalEncoder {
    forks: ForkSchedule,
}

impl CanonicalEncoder {
    pub fn new(forks: ForkSchedule) -> Self {
        Self { forks }
    }

    pub fn forks(&self) -> ForkSchedule {
        self.forks
    }

    /// Canonical header bytes. Fails unless they hash to `block.hash`.
    pub fn encode_header(&self, block: &BlockFields) -> Result<Vec<u8>, EncodingError> {
        let header = CanonicalHeader::from_block(block);
        let encoded = header.to_bytes();
        let actual = crate::keccak256(&encoded);
        if actual != block.hash {
            warn!(
                block_number = block.block_number(),
                expected = ?block.hash,
                ?actual,
                "Header does not hash to advertised block hash"
            );
            return Err(EncodingError::EncodingMismatch {
                expected: block.hash,
                actual,
            });
        }
        Ok(encoded)
    }

    /// Envelope type for a transaction or receipt at `block_number`.
    pub fn resolve_type(
        &self,
        code: Option<u64>,
        block_number: u64,
    ) -> Result<TransactionType, EncodingError> {
        let tx_type = TransactionType::from_code(code, block_number)?;
        if !self.forks.permits(tx_type, block_number) {
            return Err(EncodingError::UnsupportedTransactionType {
                tx_type: u64::from(tx_type.code()),
                block_number,
            });
        }
        Ok(tx_type)
    }

    pub fn canonical_transaction(
        &self,
        fields: &TransactionFields,
        block_number: u64,
    ) -> Result<CanonicalTransaction, EncodingError> {
        let tx_type = self.resolve_type(fields.tx_type.map(|t| t.as_u64()), block_number)?;
        CanonicalTransaction::encode(tx_type, fields)
    }

    pub fn encode_transaction(
        &self,
        fields: &TransactionFields,
        block_number: u64,
    ) -> Result<Vec<u8>, EncodingError> {
        self.canonical_transaction(fields, block_number)
            .map(CanonicalTransaction::into_bytes)
    }

    pub fn encode_receipt(
        &self,
        fields: &ReceiptFields,
        block_number: u64,
    ) -> Result<Vec<u8>, EncodingError> {
        let tx_type = self.resolve_type(fields.tx_type.map(|t| t.as_u64()), block_number)?;
        CanonicalReceipt::encode(tx_type, fields).map(CanonicalReceipt::into_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_before_berlin_rejected() {
        let encoder = CanonicalEncoder::default();
        let err = encoder.resolve_type(Some(1), 12_000_000).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnsupportedTransactionType {
                tx_type: 1,
                block_number: 12_000_000
            }
        );
        assert_eq!(
            encoder.resolve_type(Some(1), 12_300_000).unwrap(),
            TransactionType::AccessList
        );
    }

    #[test]
    fn test_dev_schedule_accepts_typed_at_genesis() {
        let encoder = CanonicalEncoder::new(ForkSchedule::all_active());
        assert_eq!(
            encoder.resolve_type(Some(2), 0).unwrap(),
            TransactionType::DynamicFee
        );
    }
}
