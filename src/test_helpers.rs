use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::adapters::clock::ManualClock;
use crate::registry::snapshot_cache::SnapshotCache;
use crate::registry::store::Registry;

pub const STALE_WINDOW: Duration = Duration::from_secs(20 * 60);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(25);

pub fn fixed_start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn manual_registry() -> (Arc<ManualClock>, Registry) {
    let clock = Arc::new(ManualClock::new(fixed_start()));
    let registry = Registry::new(clock.clone());
    (clock, registry)
}

pub fn manual_cache() -> (Arc<ManualClock>, Arc<Registry>, SnapshotCache) {
    let (clock, registry) = manual_registry();
    let registry = Arc::new(registry);
    let cache = SnapshotCache::new(Arc::clone(&registry), REFRESH_INTERVAL);
    (clock, registry, cache)
}
