//! Receipt encodings.

use rlp::RlpStream;
use shared_types::{LogFields, ReceiptFields, U256};

use crate::domain::errors::EncodingError;
use crate::domain::transaction::TransactionType;

/// Map a receipt outcome to the first receipt field.
///
/// `0` becomes the empty string and `1` the single byte `0x01`; any other
/// value is an intermediate state root and is written as 32 big-endian bytes.
pub fn outcome_bytes(outcome: U256) -> Vec<u8> {
    if outcome.is_zero() {
        Vec::new()
    } else if outcome == U256::one() {
        vec![0x01]
    } else {
        let mut root = [0u8; 32];
        outcome.to_big_endian(&mut root);
        root.to_vec()
    }
}

/// A receipt in its canonical network encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalReceipt {
    pub tx_type: TransactionType,
    bytes: Vec<u8>,
}

impl CanonicalReceipt {
    pub fn encode(tx_type: TransactionType, fields: &ReceiptFields) -> Result<Self, EncodingError> {
        let outcome = fields.outcome().ok_or(EncodingError::MalformedStatus {
            transaction_hash: fields.transaction_hash,
        })?;

        let mut s = RlpStream::new_list(4);
        s.append(&outcome_bytes(outcome));
        s.append(&fields.cumulative_gas_used);
        s.append(&fields.logs_bloom);
        append_logs(&mut s, &fields.logs);
        let payload = s.out();

        let bytes = if tx_type.is_typed() {
            let mut out = Vec::with_capacity(payload.len() + 1);
            out.push(tx_type.code());
            out.extend_from_slice(&payload);
            out
        } else {
            payload.to_vec()
        };

        Ok(Self { tx_type, bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn append_logs(s: &mut RlpStream, logs: &[LogFields]) {
    s.begin_list(logs.len());
    for log in logs {
        s.begin_list(3);
        s.append(&log.address);
        s.begin_list(log.topics.len());
        for topic in &log.topics {
            s.append(topic);
        }
        s.append(&log.data.0);
    }
}
