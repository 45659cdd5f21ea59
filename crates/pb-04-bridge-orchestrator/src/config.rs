//! # Orchestrator Configuration
//!
//! Timing, content-key and archive settings for one bridge run.

use std::path::PathBuf;
use std::time::Duration;

use pb_01_canonical_encoding::ForkSchedule;
use serde::{Deserialize, Serialize};

/// How long to wait for transaction receipts to appear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Sleep between receipt lookups.
    pub poll_interval_secs: u64,

    /// Give up on a receipt after this long; surfaces as a transient error.
    pub max_wait_secs: u64,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            max_wait_secs: 120,
        }
    }
}

impl ReceiptConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

/// Content key shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentKeyConfig {
    /// Chain id embedded in every key; `None` produces the plain
    /// tag-plus-hash form.
    pub chain_id: Option<u16>,
}

/// Orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub receipts: ReceiptConfig,

    pub content_keys: ContentKeyConfig,

    /// Sleep between polls of the new-block filter.
    pub head_poll_interval_secs: u64,

    /// Directory that receives receipt encodings failing verification.
    pub bad_receipt_dir: PathBuf,

    /// Accept every typed transaction from genesis instead of the mainnet
    /// fork heights.
    pub dev_chain: bool,

    /// Background retry tasks allowed at once; one is started per block.
    pub max_retry_tasks: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            receipts: ReceiptConfig::default(),
            content_keys: ContentKeyConfig::default(),
            head_poll_interval_secs: 6,
            bad_receipt_dir: std::env::temp_dir(),
            dev_chain: false,
            max_retry_tasks: 64,
        }
    }
}

impl OrchestratorConfig {
    /// Short waits for tests.
    pub fn for_testing(bad_receipt_dir: PathBuf) -> Self {
        Self {
            receipts: ReceiptConfig {
                poll_interval_secs: 1,
                max_wait_secs: 5,
            },
            content_keys: ContentKeyConfig::default(),
            head_poll_interval_secs: 1,
            bad_receipt_dir,
            dev_chain: false,
            max_retry_tasks: 64,
        }
    }

    pub fn head_poll_interval(&self) -> Duration {
        Duration::from_secs(self.head_poll_interval_secs)
    }

    pub fn fork_schedule(&self) -> ForkSchedule {
        if self.dev_chain {
            ForkSchedule::all_active()
        } else {
            ForkSchedule::mainnet()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.receipts.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.receipts.max_wait(), Duration::from_secs(120));
        assert_eq!(config.head_poll_interval(), Duration::from_secs(6));
        assert_eq!(config.content_keys.chain_id, None);
        assert_eq!(config.max_retry_tasks, 64);
        assert_eq!(config.fork_schedule(), ForkSchedule::mainnet());
    }

    #[test]
    fn test_dev_chain_enables_all_forks() {
        let config = OrchestratorConfig {
            dev_chain: true,
            ..OrchestratorConfig::default()
        };
        assert_eq!(config.fork_schedule(), ForkSchedule::all_active());
    }
}
