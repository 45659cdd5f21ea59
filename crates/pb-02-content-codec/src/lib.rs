//! # pb-02-content-codec
//!
//! Content keys and content values of the history network.
//!
//! A content key addresses one datum of one block:
//!
//! ```text
//! [type_tag: 1][chain_id: 2, little-endian, optional][block_hash: 32]
//! ```
//!
//! A content value is the datum itself: the raw header encoding, an SSZ
//! container of (transaction list, joined uncle headers), or an SSZ list of
//! receipt encodings. List limits are enforced on both encode and decode.

pub mod codec;
pub mod domain;

pub use codec::{
    body_value, decode_body_value, decode_receipts_value, receipts_value, ContentKeyCodec,
};
pub use domain::*;
