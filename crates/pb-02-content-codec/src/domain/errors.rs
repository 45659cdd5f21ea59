use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid content key length {len}, expected 33 or 35 bytes")]
    InvalidContentKey { len: usize },

    #[error("Unknown content type tag {0:#04x}")]
    UnknownContentType(u8),

    #[error("{what} length {len} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("SSZ decode failed: {0}")]
    Decode(String),
}
