//! Background health monitor
//!
//! The monitor task is the only writer of the healthy flag. Requests read the
//! flag through a `watch::Receiver` without locking.

use crate::supervisor::ExitReceiver;
use crate::transport::DecisionTransport;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Handle to a running monitor task
pub(crate) struct HealthMonitor {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Start probing every `period`; the first probe happens one period from now
    ///
    /// When `exit_rx` is given, a process exit marks the backend unhealthy
    /// immediately and for good.
    pub(crate) fn spawn<T: DecisionTransport>(
        transport: Arc<T>,
        healthy_tx: watch::Sender<bool>,
        period: Duration,
        exit_rx: Option<ExitReceiver>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(transport, healthy_tx, period, exit_rx, shutdown_rx));
        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for it to finish
    pub(crate) async fn stop(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Health monitor task failed");
            }
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run<T: DecisionTransport>(
    transport: Arc<T>,
    healthy_tx: watch::Sender<bool>,
    period: Duration,
    mut exit_rx: Option<ExitReceiver>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut process_exited = false;

    tracing::debug!(interval = ?period, "Health monitor started");

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            status = process_exit(&mut exit_rx), if !process_exited => {
                process_exited = true;
                tracing::warn!(%status, "Decision backend process exited, marking unhealthy");
                healthy_tx.send_replace(false);
            }
            _ = ticker.tick() => {
                let healthy = !process_exited && transport.health().await;
                let previous = healthy_tx.send_replace(healthy);
                if previous && !healthy {
                    tracing::warn!("Health check failed - decision backend appears down");
                } else if !previous && healthy {
                    tracing::info!("Decision backend is healthy again");
                }
            }
        }
    }

    tracing::debug!("Health monitor stopped");
}

async fn process_exit(exit_rx: &mut Option<ExitReceiver>) -> String {
    match exit_rx {
        Some(rx) => match rx.wait_for(Option::is_some).await {
            Ok(status) => (*status).clone().unwrap_or_default(),
            Err(_) => "exit watcher stopped".to_string(),
        },
        None => std::future::pending().await,
    }
}
