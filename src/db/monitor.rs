use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::db::Database;
use crate::runtime::FlagSource;

/// Background database reachability watchdog.
///
/// Publishes the last probe result over a watch channel so consumers can
/// either read the current state (`/health`) or subscribe to transitions
/// (the startup connectivity logger). Starts out "down" until the first
/// probe succeeds.
pub struct HealthMonitor {
    tx: watch::Sender<bool>,
}

impl HealthMonitor {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(false);
        Arc::new(Self { tx })
    }

    /// Spawn the probe loop. One probe per interval tick, starting now.
    pub fn spawn_prober(self: &Arc<Self>, db: Arc<Database>, interval: Duration) {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match db.health_check().await {
                    Ok(()) => monitor.record(true),
                    Err(e) => {
                        debug!(error = %e, "database probe failed");
                        monitor.record(false);
                    }
                }
            }
        });
    }

    /// Record a probe outcome. Subscribers are only woken on transitions.
    pub fn record(&self, up: bool) {
        self.tx.send_if_modified(|current| {
            if *current != up {
                *current = up;
                true
            } else {
                false
            }
        });
    }

    /// Last known reachability.
    pub fn current(&self) -> bool {
        *self.tx.borrow()
    }
}

impl FlagSource for HealthMonitor {
    fn current(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
