use chrono::{DateTime, Utc};

/// Source of "now" for expiry decisions, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
