//! Domain layer for the bridge orchestrator.

pub mod builder;
pub mod entities;
pub mod errors;

pub use builder::ContentBuilder;
pub use entities::{BlockFailure, BlockId, RunReport};
pub use errors::BridgeError;
