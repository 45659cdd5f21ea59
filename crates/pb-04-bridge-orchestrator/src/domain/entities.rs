//! Run reports.

use std::fmt;

use pb_02_content_codec::ContentKey;
use pb_03_content_propagation::RetryReport;
use shared_types::Hash;

/// How a block was addressed when it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    Number(u64),
    Hash(Hash),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => write!(f, "#{n}"),
            BlockId::Hash(h) => write!(f, "{h:?}"),
        }
    }
}

/// A block whose pipeline stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    pub block: BlockId,
    pub reason: String,
}

/// Summary of one orchestrator mode run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Block numbers that went through the full pipeline, in order.
    pub processed: Vec<u64>,
    pub failed: Vec<BlockFailure>,
    /// Content items offered at least once.
    pub content_items: usize,
    /// Items still below the peers threshold when the run ended.
    pub unsatisfied: Vec<ContentKey>,
    /// The run stopped on a shutdown request.
    pub interrupted: bool,
}

impl RunReport {
    pub fn record_failure(&mut self, block: BlockId, reason: impl Into<String>) {
        self.failed.push(BlockFailure {
            block,
            reason: reason.into(),
        });
    }

    /// Fold in the outcome of one retry task.
    pub fn absorb(&mut self, retry: RetryReport) {
        self.unsatisfied.extend(retry.unsatisfied);
        self.interrupted |= retry.cancelled;
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.unsatisfied.is_empty() && !self.interrupted
    }
}
