//! Fork-dependent header shapes.

use rlp::{Encodable, RlpStream};
use shared_types::{Address, BlockFields, Bloom, Hash, H64, U256};

use crate::algorithms::keccak256;

/// The fifteen fields every header carries, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    pub parent_hash: Hash,
    pub uncles_hash: Hash,
    pub coinbase: Address,
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    pub number: u64,
    pub gas_limit: U256,
    pub gas_used: U256,
    pub timestamp: U256,
    pub extra_data: Vec<u8>,
    pub mix_hash: Hash,
    pub nonce: H64,
}

impl HeaderFields {
    const FIELD_COUNT: usize = 15;

    fn append_to(&self, s: &mut RlpStream) {
        s.append(&self.parent_hash);
        s.append(&self.uncles_hash);
        s.append(&self.coinbase);
        s.append(&self.state_root);
        s.append(&self.transactions_root);
        s.append(&self.receipts_root);
        s.append(&self.logs_bloom);
        s.append(&self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.timestamp);
        s.append(&self.extra_data);
        s.append(&self.mix_hash);
        s.append(&self.nonce);
    }
}

/// A header in the shape its fork prescribes.
///
/// The variant is chosen by the presence of a base fee, never by block
/// number, so dev chains with London active from genesis encode correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalHeader {
    Legacy(HeaderFields),
    BaseFeeBearing {
        fields: HeaderFields,
        base_fee_per_gas: U256,
    },
}

impl CanonicalHeader {
    pub fn from_block(block: &BlockFields) -> Self {
        let fields = HeaderFields {
            parent_hash: block.parent_hash,
            uncles_hash: block.uncles_hash,
            coinbase: block.coinbase,
            state_root: block.state_root,
            transactions_root: block.transactions_root,
            receipts_root: block.receipts_root,
            logs_bloom: block.logs_bloom,
            difficulty: block.difficulty,
            number: block.block_number(),
            gas_limit: block.gas_limit,
            gas_used: block.gas_used,
            timestamp: block.timestamp,
            extra_data: block.extra_data.to_vec(),
            mix_hash: block.mix_hash,
            nonce: block.nonce,
        };

        match block.base_fee_per_gas {
            Some(base_fee_per_gas) => CanonicalHeader::BaseFeeBearing {
                fields,
                base_fee_per_gas,
            },
            None => CanonicalHeader::Legacy(fields),
        }
    }

    pub fn fields(&self) -> &HeaderFields {
        match self {
            CanonicalHeader::Legacy(fields) => fields,
            CanonicalHeader::BaseFeeBearing { fields, .. } => fields,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }

    pub fn hash(&self) -> Hash {
        keccak256(&self.to_bytes())
    }
}

impl Encodable for CanonicalHeader {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            CanonicalHeader::Legacy(fields) => {
                s.begin_list(HeaderFields::FIELD_COUNT);
                fields.append_to(s);
            }
            CanonicalHeader::BaseFeeBearing {
                fields,
                base_fee_per_gas,
            } => {
                s.begin_list(HeaderFields::FIELD_COUNT + 1);
                fields.append_to(s);
                s.append(base_fee_per_gas);
            }
        }
    }
}
