use chrono::{DateTime, Utc};

/// Source of wall-clock time for write stamps, eviction and cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
