//! Transaction envelopes: legacy, access-list (EIP-2930) and dynamic-fee
//! (EIP-1559).

use rlp::RlpStream;
use shared_types::{AccessListItem, Hash, TransactionFields, U256};

use crate::algorithms::keccak256;
use crate::domain::errors::EncodingError;

const RECORD: &str = "transaction";

/// Closed set of envelope discriminators this encoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Legacy,
    AccessList,
    DynamicFee,
}

impl TransactionType {
    /// Map a reported `type` value to an envelope. A missing type is legacy.
    pub fn from_code(code: Option<u64>, block_number: u64) -> Result<Self, EncodingError> {
        match code {
            None | Some(0) => Ok(TransactionType::Legacy),
            Some(1) => Ok(TransactionType::AccessList),
            Some(2) => Ok(TransactionType::DynamicFee),
            Some(other) => Err(EncodingError::UnsupportedTransactionType {
                tx_type: other,
                block_number,
            }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TransactionType::Legacy => 0,
            TransactionType::AccessList => 1,
            TransactionType::DynamicFee => 2,
        }
    }

    pub fn is_typed(self) -> bool {
        self != TransactionType::Legacy
    }
}

/// A transaction in its canonical network encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTransaction {
    pub tx_type: TransactionType,
    bytes: Vec<u8>,
}

impl CanonicalTransaction {
    /// Encode `fields` in the envelope named by `tx_type`.
    pub fn encode(tx_type: TransactionType, fields: &TransactionFields) -> Result<Self, EncodingError> {
        let bytes = match tx_type {
            TransactionType::Legacy => encode_legacy(fields)?,
            TransactionType::AccessList => typed(tx_type, encode_access_list(fields)?),
            TransactionType::DynamicFee => typed(tx_type, encode_dynamic_fee(fields)?),
        };
        Ok(Self { tx_type, bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Transaction hash: keccak256 of the full envelope.
    pub fn hash(&self) -> Hash {
        keccak256(&self.bytes)
    }
}

fn typed(tx_type: TransactionType, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(tx_type.code());
    out.extend_from_slice(&payload);
    out
}

fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, EncodingError> {
    value.ok_or(EncodingError::MissingField {
        field,
        record: RECORD,
    })
}

fn append_to(s: &mut RlpStream, fields: &TransactionFields) {
    match &fields.to {
        Some(to) => s.append(to),
        None => s.append_empty_data(),
    };
}

fn append_signature(s: &mut RlpStream, fields: &TransactionFields) {
    s.append(&fields.v.as_u64());
    s.append(&fields.r);
    s.append(&fields.s);
}

fn append_access_list(s: &mut RlpStream, list: &[AccessListItem]) {
    s.begin_list(list.len());
    for item in list {
        s.begin_list(2);
        s.append(&item.address);
        s.begin_list(item.storage_keys.len());
        for key in &item.storage_keys {
            s.append(key);
        }
    }
}

/// rlp([nonce, gasPrice, gas, to, value, input, v, r, s])
fn encode_legacy(fields: &TransactionFields) -> Result<Vec<u8>, EncodingError> {
    let gas_price: U256 = required(fields.gas_price, "gasPrice")?;

    let mut s = RlpStream::new_list(9);
    s.append(&fields.nonce);
    s.append(&gas_price);
    s.append(&fields.gas);
    append_to(&mut s, fields);
    s.append(&fields.value);
    s.append(&fields.input.0);
    append_signature(&mut s, fields);
    Ok(s.out().to_vec())
}

/// rlp([chainId, nonce, gasPrice, gas, to, value, data, accessList, yParity, r, s])
fn encode_access_list(fields: &TransactionFields) -> Result<Vec<u8>, EncodingError> {
    let chain_id = required(fields.chain_id, "chainId")?;
    let gas_price = required(fields.gas_price, "gasPrice")?;

    let mut s = RlpStream::new_list(11);
    s.append(&chain_id.as_u64());
    s.append(&fields.nonce);
    s.append(&gas_price);
    s.append(&fields.gas);
    append_to(&mut s, fields);
    s.append(&fields.value);
    s.append(&fields.input.0);
    append_access_list(&mut s, fields.access_list.as_deref().unwrap_or_default());
    append_signature(&mut s, fields);
    Ok(s.out().to_vec())
}

/// rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gas, to, value,
/// data, accessList, yParity, r, s])
fn encode_dynamic_fee(fields: &TransactionFields) -> Result<Vec<u8>, EncodingError> {
    let chain_id = required(fields.chain_id, "chainId")?;
    let max_priority = required(fields.max_priority_fee_per_gas, "maxPriorityFeePerGas")?;
    let max_fee = required(fields.max_fee_per_gas, "maxFeePerGas")?;

    let mut s = RlpStream::new_list(12);
    s.append(&chain_id.as_u64());
    s.append(&fields.nonce);
    s.append(&max_priority);
    s.append(&max_fee);
    s.append(&fields.gas);
    append_to(&mut s, fields);
    s.append(&fields.value);
    s.append(&fields.input.0);
    append_access_list(&mut s, fields.access_list.as_deref().unwrap_or_default());
    append_signature(&mut s, fields);
    Ok(s.out().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Bytes, H160, H256, U64};

    fn legacy_fields() -> TransactionFields {
        TransactionFields {
            hash: None,
            tx_type: None,
            chain_id: None,
            nonce: U256::from(9),
            gas_price: Some(U256::from(20_000_000_000u64)),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
            gas: U256::from(21_000),
            to: Some(H160::repeat_byte(0x35)),
            value: U256::exp10(18),
            input: Bytes::default(),
            access_list: None,
            v: U64::from(37),
            r: U256::from(1),
            s: U256::from(2),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = TransactionType::from_code(Some(3), 20_000_000).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnsupportedTransactionType {
                tx_type: 3,
                block_number: 20_000_000
            }
        );
    }

    #[test]
    fn test_missing_type_is_legacy() {
        assert_eq!(
            TransactionType::from_code(None, 1).unwrap(),
            TransactionType::Legacy
        );
    }

    #[test]
    fn test_legacy_is_plain_list() {
        let tx = CanonicalTransaction::encode(TransactionType::Legacy, &legacy_fields()).unwrap();
        let rlp = rlp::Rlp::new(tx.as_bytes());
        assert!(rlp.is_list());
        assert_eq!(rlp.item_count().unwrap(), 9);
        assert_eq!(rlp.val_at::<u64>(6).unwrap(), 37);
    }

    #[test]
    fn test_contract_creation_has_empty_to() {
        let mut fields = legacy_fields();
        fields.to = None;
        let tx = CanonicalTransaction::encode(TransactionType::Legacy, &fields).unwrap();
        let rlp = rlp::Rlp::new(tx.as_bytes());
        assert_eq!(rlp.at(3).unwrap().as_raw(), &[0x80]);
    }

    #[test]
    fn test_typed_envelope_prefix() {
        let mut fields = legacy_fields();
        fields.chain_id = Some(U64::from(1));
        fields.v = U64::from(1);
        fields.access_list = Some(vec![AccessListItem {
            address: H160::repeat_byte(0x77),
            storage_keys: vec![H256::zero()],
        }]);
        let tx = CanonicalTransaction::encode(TransactionType::AccessList, &fields).unwrap();
        assert_eq!(tx.as_bytes()[0], 0x01);
        let rlp = rlp::Rlp::new(&tx.as_bytes()[1..]);
        assert_eq!(rlp.item_count().unwrap(), 11);
        assert_eq!(rlp.at(7).unwrap().item_count().unwrap(), 1);
    }

    #[test]
    fn test_dynamic_fee_requires_fee_caps() {
        let mut fields = legacy_fields();
        fields.chain_id = Some(U64::from(1));
        let err = CanonicalTransaction::encode(TransactionType::DynamicFee, &fields).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::MissingField {
                field: "maxPriorityFeePerGas",
                ..
            }
        ));
    }
}
