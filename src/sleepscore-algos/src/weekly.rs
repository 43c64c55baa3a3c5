use std::fmt::Display;

use chrono::{NaiveDate, TimeDelta};

use crate::DayMetrics;
use crate::helpers::{format_hm::FormatHM, mean, mean_deltas, round_float};

/// Ordered per-day results for the lookback window. Immutable; every
/// pipeline run builds a fresh summary that replaces the previous one
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    /// Sorted descending by day, most recent first.
    days: Vec<DayMetrics>,
    /// Most recent day with data, `None` when `days` is empty.
    selected_day: Option<NaiveDate>,
}

/// Arithmetic means over all days present in a summary. All-zero for an
/// empty summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeeklyAverages {
    pub score: f64,
    pub sleep_duration: TimeDelta,
    pub deep_sleep_pct: f64,
    pub sleep_efficiency: f64,
}

impl WeeklySummary {
    pub fn build(mut days: Vec<DayMetrics>) -> Self {
        days.sort_by(|a, b| b.day.cmp(&a.day));
        let selected_day = days.first().map(|metrics| metrics.day);

        Self { days, selected_day }
    }

    pub fn days(&self) -> &[DayMetrics] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn selected_day(&self) -> Option<&DayMetrics> {
        self.selected_day.and_then(|day| self.day(day))
    }

    /// Looks one calendar day up; `None` when that day has no bucket.
    pub fn day(&self, date: NaiveDate) -> Option<&DayMetrics> {
        self.days.iter().find(|metrics| metrics.day == date)
    }

    pub fn averages(&self) -> WeeklyAverages {
        if self.days.is_empty() {
            return WeeklyAverages::default();
        }

        let scores: Vec<f64> = self.days.iter().map(|d| f64::from(d.score)).collect();
        let durations: Vec<TimeDelta> = self.days.iter().map(|d| d.total_sleep).collect();
        let deep: Vec<f64> = self.days.iter().map(|d| d.deep_sleep_pct).collect();
        let efficiency: Vec<f64> = self.days.iter().map(|d| d.sleep_efficiency).collect();

        WeeklyAverages {
            score: round_float(mean(&scores)),
            sleep_duration: mean_deltas(&durations),
            deep_sleep_pct: round_float(mean(&deep)),
            sleep_efficiency: round_float(mean(&efficiency)),
        }
    }
}

impl Display for WeeklyAverages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Score: {}, Sleep: {}, Deep: {}%, Efficiency: {}%",
            self.score,
            self.sleep_duration.format_hm(),
            self.deep_sleep_pct,
            self.sleep_efficiency
        ))
    }
}
