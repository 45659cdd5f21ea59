use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use bridge_runtime::cli::Cli;
use bridge_runtime::container::BridgeContainer;
use bridge_runtime::{log_report, run_mode};
use bridge_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.json_logs {
        telemetry = telemetry.with_json_logs(true);
    }
    init_telemetry(&telemetry).context("Failed to initialise logging")?;

    let config = cli
        .load_config(|name| std::env::var(name).ok())
        .context("Invalid configuration")?;
    let container = Arc::new(BridgeContainer::new(config)?);

    let signal_container = Arc::clone(&container);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after in-flight work");
                signal_container.request_shutdown();
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    info!(mode = ?cli.mode, "Portal bridge starting");
    let report = run_mode(&container, &cli.mode).await?;
    log_report(&report);

    if !report.is_success() {
        if !report.unsatisfied.is_empty() {
            error!(
                remaining = report.unsatisfied.len(),
                "Process exited before pushing out all content"
            );
        }
        std::process::exit(1);
    }
    Ok(())
}
