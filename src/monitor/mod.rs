use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::metrics::prometheus as telemetry;
use crate::notify::Notifier;
use crate::state::MonitorState;
use crate::stock::{StockSnapshot, StockSource};

/// What a single fetch → detect → notify pass ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    FetchFailed,
    Unchanged,
    Notified,
    NotifyFailed,
}

impl CycleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleOutcome::FetchFailed => "fetch_failed",
            CycleOutcome::Unchanged => "unchanged",
            CycleOutcome::Notified => "notified",
            CycleOutcome::NotifyFailed => "notify_failed",
        }
    }
}

/// Flips `shutdown` once `signal` resolves. If the signal cannot be
/// installed the sender is kept alive forever, so the monitor keeps running.
pub async fn forward_shutdown<F>(signal: F, shutdown: watch::Sender<bool>)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        warn!(error = %err, "failed to listen for Ctrl-C, monitor will run until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl-C, shutting down");
    let _ = shutdown.send(true);
}

/// Polls a [`StockSource`] on a fixed interval and forwards changed
/// snapshots to a [`Notifier`].
pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    state: MonitorState,
    interval: Duration,
    cycle: u64,
}

impl<S: StockSource, N: Notifier> Monitor<S, N> {
    pub fn new(source: S, notifier: N, interval: Duration) -> Self {
        Self {
            source,
            notifier,
            state: MonitorState::new(),
            interval,
            cycle: 0,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Runs cycles until `shutdown` flips to true or its sender is dropped.
    /// Shutdown also cuts short an in-flight cycle or the sleep between cycles.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "monitor started");

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                outcome = self.run_cycle() => {
                    telemetry::record_cycle(outcome.as_str());
                }
                _ = shutdown.changed() => break,
            }

            info!(
                cycle = self.cycle,
                "waiting {}s until next check",
                self.interval.as_secs()
            );
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!(cycles = self.cycles(), "monitor stopped");
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.cycle += 1;
        let cycle = self.cycle;
        info!(cycle, "[{}] checking stock", Local::now().format("%H:%M:%S"));

        let Some(snapshot) = self.fetch().await else {
            warn!(cycle, "could not fetch stock data");
            return CycleOutcome::FetchFailed;
        };

        if !self.state.has_changed(&snapshot) {
            info!(cycle, "no change, still watching");
            return CycleOutcome::Unchanged;
        }

        info!(
            cycle,
            fingerprint = ?self.state().last_fingerprint(),
            "stock change detected"
        );
        if let Ok(pretty) = serde_json::to_string_pretty(snapshot.as_value()) {
            debug!(cycle, "new data:\n{pretty}");
        }

        let delivered = self.notify(&snapshot).await;
        telemetry::record_notification(delivered);
        if delivered {
            info!(cycle, "change notification sent");
            CycleOutcome::Notified
        } else {
            warn!(cycle, "change notification could not be sent");
            CycleOutcome::NotifyFailed
        }
    }

    async fn fetch(&self) -> Option<StockSnapshot> {
        let started = Instant::now();
        let result = self.source.fetch().await;
        telemetry::record_fetch_latency(started.elapsed().as_secs_f64() * 1_000.0);

        match result {
            Ok(snapshot) if snapshot.is_empty() => {
                warn!("endpoint returned no stock data");
                None
            }
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "error fetching stock data");
                None
            }
        }
    }

    async fn notify(&self, snapshot: &StockSnapshot) -> bool {
        match self.notifier.notify(snapshot).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "error sending webhook");
                false
            }
        }
    }
}
