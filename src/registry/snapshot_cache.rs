use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::Result;
use crate::registry::store::Registry;

struct CachedSnapshot {
    body: Arc<str>,
    computed_at: DateTime<Utc>,
}

impl CachedSnapshot {
    fn is_stale(&self, now: DateTime<Utc>, refresh: TimeDelta) -> bool {
        now.signed_duration_since(self.computed_at) >= refresh
    }
}

/// Serialized listing array, recomputed at most once per refresh interval.
///
/// Writes never invalidate the cached body; a reader may see data up to
/// `refresh_interval` old.
pub struct SnapshotCache {
    registry: Arc<Registry>,
    refresh_interval: TimeDelta,
    cached: Mutex<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(registry: Arc<Registry>, refresh_interval: Duration) -> Self {
        Self {
            registry,
            refresh_interval: TimeDelta::from_std(refresh_interval).unwrap_or(TimeDelta::MAX),
            cached: Mutex::new(None),
        }
    }

    pub fn read(&self) -> Result<Arc<str>> {
        let now = self.registry.clock().now();
        self.read_at(now)
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> Result<Arc<str>> {
        let mut cached = self.cached.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Snapshot cache lock poisoned, recovering");
            poisoned.into_inner()
        });

        if let Some(entry) = cached.as_ref()
            && !entry.is_stale(now, self.refresh_interval)
        {
            return Ok(Arc::clone(&entry.body));
        }

        let listings = self.registry.snapshot_all();
        let body: Arc<str> = serde_json::to_string(&listings)?.into();
        tracing::debug!(listings = listings.len(), "Recomputed listing snapshot");
        *cached = Some(CachedSnapshot {
            body: Arc::clone(&body),
            computed_at: now,
        });
        Ok(body)
    }

    /// Whether the next read at `now` would recompute.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.cached
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .is_none_or(|entry| entry.is_stale(now, self.refresh_interval))
    }
}
