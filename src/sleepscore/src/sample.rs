use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use sleepscore_types::{SleepInterval, SleepStage};

use crate::{IngestError, SleepDataSource};

/// Generates plausible random nights instead of querying a health store.
///
/// This is the only place randomness is allowed; the scoring path itself is
/// deterministic. Selected explicitly (CLI `--sample`), never silently.
pub struct SampleDataSource;

impl SleepDataSource for SampleDataSource {
    async fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepInterval>, IngestError> {
        Ok(generate_sample_intervals(start, end))
    }
}

/// One random night per calendar day whose start fits inside `[start, end)`.
pub fn generate_sample_intervals(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<SleepInterval> {
    let mut rng = rand::rng();
    let mut intervals = Vec::new();

    let mut bedtime = start;
    while bedtime < end {
        let mut cursor = bedtime + TimeDelta::minutes(rng.random_range(0..90));

        let mut stage = |stage: SleepStage, minutes: std::ops::RangeInclusive<i64>| {
            let duration = TimeDelta::minutes(rng.random_range(minutes));
            let interval = SleepInterval::new(cursor, cursor + duration, stage);
            cursor += duration;
            interval
        };

        let night = [
            stage(SleepStage::InBed, 10..=40),
            stage(SleepStage::AsleepCore, 180..=300),
            stage(SleepStage::AsleepDeep, 25..=70),
            stage(SleepStage::AsleepRem, 60..=120),
            stage(SleepStage::Awake, 5..=25),
            stage(SleepStage::AsleepCore, 30..=90),
        ];
        intervals.extend(night.into_iter().filter(|i| i.start < end));

        bedtime += TimeDelta::days(1);
    }

    intervals
}
