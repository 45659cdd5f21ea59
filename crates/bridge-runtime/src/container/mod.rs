//! # Bridge Container
//!
//! Builds the concrete adapters from a validated [`BridgeConfig`] and owns
//! the orchestrator plus the shutdown channel every long-running task
//! listens on.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use pb_03_content_propagation::{ContentEndpoint, JsonRpcEndpoint, PropagationClient};
use pb_04_bridge_orchestrator::{BridgeOrchestrator, Web3ChainSource};
use tokio::sync::watch;
use tracing::info;

pub use config::{BridgeConfig, ChainSourceConfig, ConfigError, EndpointConfig};

/// The orchestrator as wired for production.
pub type Web3Orchestrator = BridgeOrchestrator<Web3ChainSource, PropagationClient>;

pub struct BridgeContainer {
    pub config: BridgeConfig,
    orchestrator: Arc<Web3Orchestrator>,
    shutdown_tx: watch::Sender<bool>,
}

impl BridgeContainer {
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let source = Web3ChainSource::new(
            config.chain.rpc_url.clone(),
            Duration::from_secs(config.chain.request_timeout_secs),
        )
        .context("Failed to create chain source")?;

        let mut endpoints: Vec<Arc<dyn ContentEndpoint>> = Vec::with_capacity(config.endpoints.urls.len());
        for url in &config.endpoints.urls {
            let endpoint = JsonRpcEndpoint::new(url.clone(), config.propagation.request_timeout)
                .with_context(|| format!("Failed to create endpoint client for {url}"))?;
            endpoints.push(Arc::new(endpoint));
        }
        let client = PropagationClient::new(endpoints, config.propagation.clone())
            .context("Failed to create propagation client")?;

        info!(
            chain_rpc = %source.url(),
            endpoints = ?client.endpoint_ids(),
            retry_threshold = config.propagation.retry_threshold,
            chain_id = ?config.orchestrator.content_keys.chain_id,
            "Bridge wired"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let orchestrator = BridgeOrchestrator::new(
            Arc::new(source),
            Arc::new(client),
            &config.orchestrator,
            &config.propagation,
            shutdown_rx,
        );

        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
            shutdown_tx,
        })
    }

    pub fn orchestrator(&self) -> Arc<Web3Orchestrator> {
        Arc::clone(&self.orchestrator)
    }

    /// Ask every mode and retry task to stop at its next check.
    pub fn request_shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            info!("Shutdown requested with no listeners left");
        }
    }
}
