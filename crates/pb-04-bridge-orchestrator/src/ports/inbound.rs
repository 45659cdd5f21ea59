//! # Inbound Ports
//!
//! The operating modes a bridge process can be started in.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{BridgeError, RunReport};

/// One entry point per operating mode.
///
/// Every mode returns once its work is done or a shutdown was requested;
/// content still below the peers threshold at that point is listed in the
/// report.
#[async_trait]
pub trait BridgeApi: Send + Sync {
    /// Process each new head block in arrival order until shutdown.
    async fn follow_head(&self) -> RunReport;

    /// Process `start..=end`, oldest first.
    async fn backfill(&self, start: u64, end: u64) -> Result<RunReport, BridgeError>;

    /// Backfill the `count` blocks below the current head, plus the head.
    async fn patch_recent(&self, count: u64) -> Result<RunReport, BridgeError>;

    /// Offer pre-encoded content files without touching the chain source.
    async fn inject_files(&self, paths: &[PathBuf]) -> Result<RunReport, BridgeError>;
}
