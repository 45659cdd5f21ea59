//! Domain layer for content propagation.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::{ContentItem, PropagationRecord, PushResult};
pub use errors::PropagationError;
pub use value_objects::{PropagationConfig, PropagationState};
