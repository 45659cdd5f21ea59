//! # Bridge Configuration
//!
//! Unified configuration for one bridge process.
//!
//! ## Precedence
//!
//! defaults < JSON config file < environment < command line

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pb_03_content_propagation::PropagationConfig;
use pb_04_bridge_orchestrator::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Chain-data source.
    pub chain: ChainSourceConfig,
    /// Network participants content is offered to.
    pub endpoints: EndpointConfig,
    /// Offer retries and endpoint startup polling.
    pub propagation: PropagationConfig,
    /// Receipt waits, content keys, bad-receipt archive, fork rules.
    pub orchestrator: OrchestratorConfig,
}

/// Chain-data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSourceConfig {
    /// JSON-RPC URL of an execution client.
    pub rpc_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ChainSourceConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Content endpoint configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// JSON-RPC URLs of already-running participant nodes.
    pub urls: Vec<String>,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No content endpoints configured. Set PORTAL_BRIDGE_ENDPOINTS or pass --endpoint.")]
    NoEndpoints,

    #[error("Retry threshold must be at least 1 peer")]
    ZeroThreshold,

    #[error("Endpoint {url:?} listed more than once")]
    DuplicateEndpoint { url: String },

    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Backfill start {start} is after end {end}")]
    InvertedRange { start: u64, end: u64 },

    #[error("Cannot read config file {path:?}: {reason}")]
    File { path: PathBuf, reason: String },
}

impl BridgeConfig {
    /// Load a JSON config file; missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |reason: String| ConfigError::File {
            path: path.to_path_buf(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| file_error(e.to_string()))
    }

    /// Apply `PORTAL_BRIDGE_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup.
    ///
    /// # Variables
    ///
    /// - `PORTAL_BRIDGE_ENDPOINTS`: comma-separated endpoint URLs
    /// - `PORTAL_BRIDGE_CHAIN_RPC`: chain source URL
    /// - `PORTAL_BRIDGE_RETRY_THRESHOLD`: peers needed per item
    /// - `PORTAL_BRIDGE_RETRY_INTERVAL_SECS`: seconds between retry rounds
    /// - `PORTAL_BRIDGE_CHAIN_ID`: chain id embedded in content keys
    /// - `PORTAL_BRIDGE_BAD_RECEIPT_DIR`: directory for invalid receipts
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORTAL_BRIDGE_ENDPOINTS") {
            self.endpoints.urls = split_urls(&value);
        }
        if let Some(value) = lookup("PORTAL_BRIDGE_CHAIN_RPC") {
            self.chain.rpc_url = value;
        }
        if let Some(value) = lookup("PORTAL_BRIDGE_RETRY_THRESHOLD") {
            self.propagation.retry_threshold = parse("PORTAL_BRIDGE_RETRY_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("PORTAL_BRIDGE_RETRY_INTERVAL_SECS") {
            let secs: u64 = parse("PORTAL_BRIDGE_RETRY_INTERVAL_SECS", &value)?;
            self.propagation.retry_interval = std::time::Duration::from_secs(secs);
        }
        if let Some(value) = lookup("PORTAL_BRIDGE_CHAIN_ID") {
            self.orchestrator.content_keys.chain_id = Some(parse("PORTAL_BRIDGE_CHAIN_ID", &value)?);
        }
        if let Some(value) = lookup("PORTAL_BRIDGE_BAD_RECEIPT_DIR") {
            self.orchestrator.bad_receipt_dir = PathBuf::from(value);
        }
        Ok(())
    }

    /// Check the configuration before anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.urls.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if self.propagation.retry_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        check_url(&self.chain.rpc_url)?;
        let mut seen = HashSet::with_capacity(self.endpoints.urls.len());
        for url in &self.endpoints.urls {
            if !seen.insert(check_url(url)?) {
                return Err(ConfigError::DuplicateEndpoint { url: url.clone() });
            }
        }
        Ok(())
    }
}

/// Reject an inclusive block range that runs backwards.
pub fn validate_range(start: u64, end: u64) -> Result<(), ConfigError> {
    if start > end {
        return Err(ConfigError::InvertedRange { start, end });
    }
    Ok(())
}

/// Split a comma-separated URL list, dropping empty entries.
pub fn split_urls(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Parse and return the normalised form, so `http://a:1` and `http://a:1/` compare equal.
fn check_url(url: &str) -> Result<reqwest::Url, ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}
