//! Galert controller entry point
//!
//! Wires the Grafana and Kubernetes clients together, heals pre-existing
//! state once, then watches Galert resources until the process is stopped.

use std::process::ExitCode;

use anyhow::Context;
use tracing::info;

use galert::grafana::GrafanaClient;
use galert::sync::{EventProcessor, StartupReconciler};
use galert::watch::WatchLoop;
use galert::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    info!(grafana_url = %config.grafana_url, "Starting galert controller");

    let grafana = GrafanaClient::new(&config).context("building the Grafana client")?;
    let client = kube::Client::try_default()
        .await
        .context("connecting to the Kubernetes API")?;

    StartupReconciler::new(client.clone(), grafana.clone())
        .run()
        .await
        .context("startup reconciliation")?;

    WatchLoop::new(client, EventProcessor::new(grafana))
        .run()
        .await
        .context("watch loop")
}
