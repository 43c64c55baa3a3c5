use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Per-day record shared with the companion display surface. Only the fields
/// that surface renders; everything else is recomputed on a fresh run.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct DaySnapshot {
    pub day: NaiveDate,
    pub score: u8,
    pub duration_seconds: i64,
}

/// Serializable snapshot of the last published weekly summary, persisted as
/// an opaque local blob. Consumers reuse it without recomputation while it
/// is inside the freshness window.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SummarySnapshot {
    pub days: Vec<DaySnapshot>,
    pub last_update: DateTime<Utc>,
}

impl SummarySnapshot {
    /// How long a snapshot may be reused before a fresh pipeline run is
    /// required.
    pub const FRESHNESS: TimeDelta = TimeDelta::hours(1);

    pub fn new(days: Vec<DaySnapshot>, last_update: DateTime<Utc>) -> Self {
        Self { days, last_update }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.last_update < Self::FRESHNESS
    }
}
