pub mod content_key;
pub mod content_value;
pub mod errors;

pub use content_key::{ContentKey, ContentType};
pub use content_value::{limits, BlockBody, ContentValue};
pub use errors::CodecError;
