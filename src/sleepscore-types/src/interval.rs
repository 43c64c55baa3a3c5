use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{InvalidInterval, SleepStage};

/// One timestamped sleep-stage interval as reported by the health store.
/// Timestamps are UTC instants; calendar-day assignment happens later with
/// an explicit time zone.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SleepInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stage: SleepStage,
}

impl SleepInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, stage: SleepStage) -> Self {
        Self { start, end, stage }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Enforces `end >= start`. A violation is fatal for the pipeline run
    /// that observes it.
    pub fn validate(&self) -> Result<(), InvalidInterval> {
        if self.end < self.start {
            return Err(InvalidInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// All intervals whose start falls on one calendar day, sorted ascending by
/// start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub intervals: Vec<SleepInterval>,
}

impl DayBucket {
    pub fn new(day: NaiveDate, intervals: Vec<SleepInterval>) -> Self {
        Self { day, intervals }
    }
}
