//! # Portal Bridge Runtime
//!
//! Process entry point for the bridge.
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line
//! 2. Initialise logging
//! 3. Load configuration (file, environment, flags) and validate it
//! 4. Wire the chain source, content endpoints and orchestrator
//! 5. Run the selected mode; Ctrl+C flips the shutdown channel
//! 6. Log the run report and exit non-zero if anything was left undone

pub mod cli;
pub mod container;

use anyhow::Result;
use pb_04_bridge_orchestrator::{BridgeApi, RunReport};
use tracing::{info, warn};

use crate::cli::Mode;
use crate::container::BridgeContainer;

/// Run one mode to completion on an already-wired container.
pub async fn run_mode(container: &BridgeContainer, mode: &Mode) -> Result<RunReport> {
    let orchestrator = container.orchestrator();
    let report = match mode {
        Mode::Latest => orchestrator.follow_head().await,
        Mode::Backfill { start, end } => orchestrator.backfill(*start, *end).await?,
        Mode::Patch { count } => orchestrator.patch_recent(*count).await?,
        Mode::Inject { paths } => orchestrator.inject_files(paths).await?,
    };
    Ok(report)
}

/// Summarise a finished run in the log.
pub fn log_report(report: &RunReport) {
    info!(
        processed = report.processed.len(),
        failed = report.failed.len(),
        content_items = report.content_items,
        unsatisfied = report.unsatisfied.len(),
        interrupted = report.interrupted,
        "Run finished"
    );
    for failure in &report.failed {
        warn!(block = %failure.block, reason = %failure.reason, "Block not bridged");
    }
}
