mod config;
mod error;
mod metrics;
mod monitor;
mod notify;
mod state;
mod stock;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use config::Config;
use monitor::{Monitor, forward_shutdown};
use notify::WebhookNotifier;
use stock::HttpStockSource;

/// Builds the filter from `RUST_LOG`-style directives. Invalid directives are
/// dropped; info is the default level.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    info!("stock-monitor starting");
    info!(
        endpoint = %config.endpoint_url,
        interval_secs = config.poll_interval.as_secs(),
        sections = ?config.sections.iter().map(|s| s.key.as_str()).collect::<Vec<_>>(),
        "checking for changes every {}s, notifying only on real changes",
        config.poll_interval.as_secs()
    );
    info!("press Ctrl+C to stop");

    if let Some(port) = config.metrics_port {
        metrics::init_metrics_server(port)?;
        info!(port, "prometheus exporter listening");
    }

    // One client shared by both directions; reqwest pools connections internally.
    let client = reqwest::Client::new();
    let source = HttpStockSource::new(client.clone(), config.endpoint_url.clone());
    let notifier = WebhookNotifier::new(
        client,
        config.webhook_url.clone(),
        config.sections.clone(),
        config.embed.clone(),
    );
    let mut monitor = Monitor::new(source, notifier, config.poll_interval);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(forward_shutdown(tokio::signal::ctrl_c(), shutdown_tx));

    monitor.run(shutdown_rx).await;

    info!("goodbye");
    Ok(())
}
