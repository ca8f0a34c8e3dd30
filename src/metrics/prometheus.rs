use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus HTTP exporter on the given port.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, histogram!) are automatically exported at /metrics.
pub fn init_metrics_server(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    Ok(())
}

// ── Poll loop metrics ────────────────────────────────────────────

pub fn record_cycle(outcome: &'static str) {
    counter!("monitor_cycles_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_latency(latency_ms: f64) {
    histogram!("monitor_fetch_latency_ms").record(latency_ms);
}

// ── Notification metrics ─────────────────────────────────────────

pub fn record_notification(delivered: bool) {
    let result = if delivered { "delivered" } else { "failed" };
    counter!("monitor_notifications_total", "result" => result).increment(1);
}
