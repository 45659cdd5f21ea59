//! # Bridge Orchestrator (pb-04)
//!
//! Moves canonical chain data into the Portal History Network.
//!
//! ## Architecture Role
//!
//! ```text
//! [ChainSource] ──block, uncles, receipts──→ [BlockPipeline]
//!                                               │ encode + verify (pb-01)
//!                                               │ key + value (pb-02)
//!                                               ↓
//!                                   [PropagationClient] (pb-03) ── offer once
//!                                               ↓
//!                                   [RetryScheduler] (pb-03) ── background, until satisfied
//! ```
//!
//! ## Modes
//!
//! - **follow-head**: new block hashes from a filter subscription, in
//!   arrival order. A dropped subscription is recreated; the mode only ends
//!   on shutdown.
//! - **backfill**: an inclusive numeric range, oldest first.
//! - **patch-recent**: backfill from `head - n` to `head`.
//! - **inject-files**: pre-encoded `.portalcontent` files, no chain access.
//!
//! ## Failure Handling
//!
//! A block whose header hash, transactions root, uncles hash or receipts
//! root does not verify is abandoned and reported; the run continues with
//! the next block. Receipt sets that fail verification are written to the
//! bad-receipt directory.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{BadReceiptArchive, Web3ChainSource};
pub use application::{BlockPipeline, BridgeOrchestrator};
pub use config::{ContentKeyConfig, OrchestratorConfig, ReceiptConfig};
pub use domain::*;
pub use ports::inbound::BridgeApi;
pub use ports::outbound::ChainSource;
