use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use sleepscore_types::SleepInterval;

/// Groups raw intervals into calendar-day buckets.
///
/// Each interval is keyed by the calendar day of its `start` timestamp in
/// `zone`. The zone is an explicit parameter so bucketing stays deterministic
/// and testable across zones and DST boundaries; the host setting is never
/// consulted. An interval that spans midnight is assigned wholly to its start
/// day, never split (open product question, behavior kept as-is).
///
/// Intervals within a bucket are sorted ascending by start time for
/// reproducibility. Empty input yields an empty map.
pub fn bucketize<Tz: TimeZone>(
    intervals: Vec<SleepInterval>,
    zone: &Tz,
) -> BTreeMap<NaiveDate, Vec<SleepInterval>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<SleepInterval>> = BTreeMap::new();

    for interval in intervals {
        let day = interval.start.with_timezone(zone).date_naive();
        buckets.entry(day).or_default().push(interval);
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|interval| interval.start);
    }

    buckets
}
