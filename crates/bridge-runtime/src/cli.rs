//! Command-line surface of the `portal-bridge` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::container::{config::validate_range, BridgeConfig, ConfigError};

/// Portal bridge: feeds canonical chain data into the Portal History Network.
#[derive(Parser, Debug)]
#[command(name = "portal-bridge")]
#[command(about = "Encode, verify and offer chain history to Portal participants")]
pub struct Cli {
    /// JSON config file; environment and flags override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Participant JSON-RPC URL (repeatable)
    #[arg(long = "endpoint", global = true)]
    pub endpoints: Vec<String>,

    /// Execution client JSON-RPC URL
    #[arg(long, global = true)]
    pub chain_rpc: Option<String>,

    /// Peers one endpoint must reach before an item counts as propagated
    #[arg(long, global = true)]
    pub retry_threshold: Option<u64>,

    /// Chain id embedded in content keys
    #[arg(long, global = true)]
    pub chain_id: Option<u16>,

    /// Where receipt sets that fail verification are written
    #[arg(long, global = true)]
    pub bad_receipt_dir: Option<PathBuf>,

    /// Accept typed transactions at any height
    #[arg(long, global = true)]
    pub dev_chain: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub mode: Mode,
}

/// Operating mode.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Follow the chain head until interrupted
    Latest,
    /// Bridge an inclusive range of block numbers
    Backfill { start: u64, end: u64 },
    /// Re-bridge the most recent blocks
    Patch {
        #[arg(default_value_t = 16)]
        count: u64,
    },
    /// Offer pre-encoded .portalcontent files or directories
    Inject {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    /// Build the effective configuration: file, then environment, then flags.
    pub fn load_config<F>(&self, lookup: F) -> Result<BridgeConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)?,
            None => BridgeConfig::default(),
        };
        config.apply_overrides(lookup)?;
        self.apply_flags(&mut config);
        config.validate()?;
        if let Mode::Backfill { start, end } = self.mode {
            validate_range(start, end)?;
        }
        Ok(config)
    }

    fn apply_flags(&self, config: &mut BridgeConfig) {
        if !self.endpoints.is_empty() {
            config.endpoints.urls = self.endpoints.clone();
        }
        if let Some(url) = &self.chain_rpc {
            config.chain.rpc_url = url.clone();
        }
        if let Some(threshold) = self.retry_threshold {
            config.propagation.retry_threshold = threshold;
        }
        if let Some(chain_id) = self.chain_id {
            config.orchestrator.content_keys.chain_id = Some(chain_id);
        }
        if let Some(dir) = &self.bad_receipt_dir {
            config.orchestrator.bad_receipt_dir = dir.clone();
        }
        config.orchestrator.dev_chain |= self.dev_chain;
    }
}
