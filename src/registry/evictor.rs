use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::registry::store::Registry;

/// Periodic sweep that drops listings nobody has re-announced.
pub struct Evictor {
    registry: Arc<Registry>,
    stale_window: Duration,
    interval: Duration,
}

/// Owns the running evictor task. Dropping it aborts the task.
pub struct EvictorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Evictor {
    pub fn new(registry: Arc<Registry>, stale_window: Duration, interval: Duration) -> Self {
        Self {
            registry,
            stale_window,
            interval,
        }
    }

    /// Run one sweep against the registry's clock.
    pub fn tick(&self) -> usize {
        let now = self.registry.clock().now();
        let evicted = self.registry.evict_stale_older_than(self.stale_window, now);
        let remaining = self.registry.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining, "Evicted stale listings");
        } else {
            tracing::debug!(remaining, "No stale listings to evict");
        }
        evicted
    }

    /// Start ticking on the current tokio runtime. The first sweep happens one
    /// full interval after spawning.
    pub fn spawn(self) -> EvictorHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                interval_secs = self.interval.as_secs(),
                stale_window_secs = self.stale_window.as_secs(),
                "Evictor started"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick();
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Evictor stopped");
                        break;
                    }
                }
            }
        });
        EvictorHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

impl EvictorHandle {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::error!("Evictor task ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for EvictorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
