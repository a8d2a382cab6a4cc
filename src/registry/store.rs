use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::listing::{Listing, ListingView, validate_id, validate_region};
use crate::error::Result;
use crate::ports::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Absent,
}

/// Authoritative map of job id to [`Listing`].
///
/// Every operation takes the single map lock for its whole duration, so
/// writers, readers and the evictor never observe each other mid-call.
pub struct Registry {
    listings: Mutex<HashMap<String, Listing>>,
    clock: Arc<dyn Clock>,
}

impl Registry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            listings: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Listing>> {
        self.listings.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Registry lock poisoned, recovering map");
            poisoned.into_inner()
        })
    }

    /// Replace the listing for `id` wholesale, stamping it with the current time.
    pub fn upsert(&self, id: &str, region: &str, player_count: u32) -> Result<UpsertOutcome> {
        validate_id(id)?;
        validate_region(region)?;

        let listing = Listing {
            region: region.to_string(),
            player_count,
            updated_at: self.clock.now(),
        };
        let previous = self.lock().insert(id.to_string(), listing);
        Ok(if previous.is_some() {
            UpsertOutcome::Replaced
        } else {
            UpsertOutcome::Inserted
        })
    }

    pub fn remove(&self, id: &str) -> RemoveOutcome {
        if self.lock().remove(id).is_some() {
            RemoveOutcome::Removed
        } else {
            RemoveOutcome::Absent
        }
    }

    /// Owned copy of every listing's public fields, sorted by id.
    pub fn snapshot_all(&self) -> Vec<ListingView> {
        let mut views: Vec<ListingView> = self
            .lock()
            .iter()
            .map(|(id, listing)| ListingView {
                id: id.clone(),
                region: listing.region.clone(),
                player_count: listing.player_count,
            })
            .collect();
        views.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        views
    }

    /// Drop every listing last written at least `stale_window` before `now`.
    /// Returns how many were dropped.
    pub fn evict_stale_older_than(&self, stale_window: Duration, now: DateTime<Utc>) -> usize {
        let window = TimeDelta::from_std(stale_window).unwrap_or(TimeDelta::MAX);
        let mut listings = self.lock();
        let before = listings.len();
        listings.retain(|_, listing| now.signed_duration_since(listing.updated_at) < window);
        before - listings.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
