use chrono::{NaiveDate, TimeDelta};
use sleepscore_types::{DayBucket, InvalidInterval, SleepInterval, SleepStage};

use crate::ScoringPolicy;
use crate::helpers::round_float;

/// Derived sleep metrics for one calendar day. Immutable value object,
/// recreated wholesale on every pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMetrics {
    pub day: NaiveDate,
    pub total_sleep: TimeDelta,
    pub deep_sleep: TimeDelta,
    pub awake_in_bed: TimeDelta,
    /// Deep sleep as a percentage of total sleep, in `[0, 100]`.
    pub deep_sleep_pct: f64,
    /// Asleep time as a percentage of total time in bed, in `[0, 100]`.
    pub sleep_efficiency: f64,
    /// Quality score in `[1, 100]`.
    pub score: u8,
}

impl DayMetrics {
    /// Derives the per-day metrics from one bucket and scores them with
    /// `policy`.
    ///
    /// An empty bucket yields all-zero durations and percentages. The only
    /// error is a malformed interval with `end < start`; missing data is
    /// never an error.
    pub fn calculate(bucket: &DayBucket, policy: ScoringPolicy) -> Result<Self, InvalidInterval> {
        for interval in &bucket.intervals {
            interval.validate()?;
        }

        let duration_where = |pred: fn(&SleepInterval) -> bool| -> TimeDelta {
            bucket
                .intervals
                .iter()
                .filter(|interval| pred(interval))
                .map(SleepInterval::duration)
                .sum()
        };

        let total_sleep = duration_where(|i| i.stage.is_asleep());
        let awake_in_bed = duration_where(|i| i.stage.is_awake_in_bed());
        let deep_sleep = duration_where(|i| i.stage == SleepStage::AsleepDeep);

        let in_bed = total_sleep + awake_in_bed;
        let deep_sleep_pct = percentage_of(deep_sleep, total_sleep);
        let sleep_efficiency = percentage_of(total_sleep, in_bed);

        let duration_hours = total_sleep.num_seconds() as f64 / 3600.0;
        let score = policy.score(duration_hours, deep_sleep_pct, sleep_efficiency);

        Ok(Self {
            day: bucket.day,
            total_sleep,
            deep_sleep,
            awake_in_bed,
            deep_sleep_pct,
            sleep_efficiency,
            score,
        })
    }

    pub fn duration_seconds(&self) -> i64 {
        self.total_sleep.num_seconds()
    }
}

/// `part / whole * 100`, zero when `whole` is zero.
fn percentage_of(part: TimeDelta, whole: TimeDelta) -> f64 {
    let whole = whole.num_seconds();
    if whole <= 0 {
        return 0.0;
    }
    round_float(part.num_seconds() as f64 / whole as f64 * 100.0)
}
