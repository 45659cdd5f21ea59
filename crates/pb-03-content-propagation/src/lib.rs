//! # Content Propagation (pb-03)
//!
//! Pushes (content key, content value) pairs to every configured network
//! endpoint and keeps re-offering them until at least one endpoint reports
//! reaching enough peers.
//!
//! ## Architecture Role
//!
//! ```text
//! [Bridge Orchestrator (4)] ──ContentItem──→ [PropagationClient]
//!                                                  │ fan-out, one offer per endpoint
//!                                     ┌────────────┼────────────┐
//!                                     ↓            ↓            ↓
//!                                [Endpoint A] [Endpoint B] [Endpoint C]
//!                                     │            │            │
//!                                     └──peers_reached per endpoint─┘
//!                                                  ↓
//!                                  [RetryScheduler] ── max < threshold? ──→ sleep, re-offer
//! ```
//!
//! ## Delivery
//!
//! - At-least-once: unsatisfied items are re-offered every interval until
//!   satisfied or the process is interrupted.
//! - A satisfied item is never offered again.
//! - An endpoint that errors counts as 0 peers reached for that round only.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use adapters::JsonRpcEndpoint;
pub use application::{shutdown_requested, PropagationClient, RetryReport, RetryScheduler};
pub use domain::*;
pub use ports::inbound::ContentPropagationApi;
pub use ports::outbound::ContentEndpoint;
