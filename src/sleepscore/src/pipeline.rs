use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use sleepscore_algos::{DayMetrics, ScoringPolicy, WeeklySummary, bucketize};
use sleepscore_types::{DayBucket, InvalidInterval};
use thiserror::Error;
use tokio::sync::watch;

use crate::{IngestError, SleepDataSource};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ingestion failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("pipeline compute failed: {0}")]
    Compute(#[from] InvalidInterval),
}

/// The single shared result slot. Replaced wholesale by each publishing run;
/// never mutated field-by-field.
#[derive(Debug, Clone, Default)]
pub struct PublishedSummary {
    ticket: u64,
    summary: Option<WeeklySummary>,
}

impl PublishedSummary {
    pub fn summary(&self) -> Option<&WeeklySummary> {
        self.summary.as_ref()
    }
}

/// Runs the full pipeline (bucketize, per-day metrics, scoring, weekly
/// aggregation) against a sleep data source and publishes the result.
///
/// Publication is all-or-nothing and last-result-wins: every run takes a
/// monotonically increasing ticket before touching the source, and a
/// completion whose ticket is older than the last published one is dropped
/// instead of overwriting a newer summary.
pub struct SleepScoreService<S> {
    source: S,
    policy: ScoringPolicy,
    ticket: AtomicU64,
    published: watch::Sender<PublishedSummary>,
}

impl<S: SleepDataSource> SleepScoreService<S> {
    /// Calendar days in the lookback window, today included.
    pub const LOOKBACK_DAYS: i64 = 7;

    pub fn new(source: S, policy: ScoringPolicy) -> Self {
        let (published, _) = watch::channel(PublishedSummary::default());

        Self {
            source,
            policy,
            ticket: AtomicU64::new(0),
            published,
        }
    }

    /// Queries the lookback window ending at `now` and runs all four stages.
    ///
    /// The freshly built summary is returned to the caller either way; it is
    /// only published if no newer run has published in the meantime.
    pub async fn compute_weekly_summary<Tz: TimeZone>(
        &self,
        zone: &Tz,
        now: DateTime<Utc>,
    ) -> Result<WeeklySummary, PipelineError> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let today = now.with_timezone(zone).date_naive();
        let window_start = today - TimeDelta::days(Self::LOOKBACK_DAYS - 1);
        let start = zone
            .from_local_datetime(&window_start.and_time(NaiveTime::MIN))
            .earliest()
            .map(|t| t.to_utc())
            .unwrap_or(now - TimeDelta::days(Self::LOOKBACK_DAYS));

        let intervals = self.source.query(start, now).await?;
        if intervals.is_empty() {
            info!("no sleep samples between {} and {}", start, now);
        }

        let buckets = bucketize(intervals, zone);

        let mut days = Vec::with_capacity(buckets.len());
        for (day, intervals) in buckets {
            let bucket = DayBucket::new(day, intervals);
            let metrics = DayMetrics::calculate(&bucket, self.policy).inspect_err(|error| {
                error!("dropping pipeline run for {}: {}", day, error);
            })?;
            days.push(metrics);
        }

        let summary = WeeklySummary::build(days);
        self.publish(ticket, &summary);

        Ok(summary)
    }

    /// Looks a day up in the latest published summary.
    pub fn select_day(&self, date: chrono::NaiveDate) -> Option<DayMetrics> {
        self.published
            .borrow()
            .summary()
            .and_then(|summary| summary.day(date))
            .copied()
    }

    /// Latest published summary, `None` before the first successful run.
    pub fn latest(&self) -> Option<WeeklySummary> {
        self.published.borrow().summary().cloned()
    }

    /// Registers for change notification; the receiver observes every
    /// published replacement.
    pub fn subscribe(&self) -> watch::Receiver<PublishedSummary> {
        self.published.subscribe()
    }

    fn publish(&self, ticket: u64, summary: &WeeklySummary) {
        self.published.send_if_modified(|published| {
            if ticket < published.ticket {
                debug!(
                    "discarding stale pipeline result (ticket {} behind {})",
                    ticket, published.ticket
                );
                return false;
            }

            *published = PublishedSummary {
                ticket,
                summary: Some(summary.clone()),
            };
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::TimeZone;
    use sleepscore_types::{SleepInterval, SleepStage};
    use tokio::sync::Notify;

    use super::*;

    fn good_night(day: u32) -> Vec<SleepInterval> {
        let bed = Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap();
        vec![
            SleepInterval::new(bed, bed + TimeDelta::hours(7), SleepStage::AsleepCore),
            SleepInterval::new(
                bed + TimeDelta::hours(7),
                bed + TimeDelta::hours(8),
                SleepStage::AsleepDeep,
            ),
        ]
    }

    struct FixedSource(Vec<SleepInterval>);

    impl SleepDataSource for FixedSource {
        async fn query(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<SleepInterval>, IngestError> {
            Ok(self.0.clone())
        }
    }

    struct DeniedSource;

    impl SleepDataSource for DeniedSource {
        async fn query(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<SleepInterval>, IngestError> {
            Err(IngestError::PermissionDenied)
        }
    }

    /// First query blocks on the gate and returns no intervals; later
    /// queries return a full night immediately.
    struct GatedSource {
        calls: AtomicUsize,
        gate: Notify,
    }

    impl SleepDataSource for GatedSource {
        async fn query(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<SleepInterval>, IngestError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
                Ok(Vec::new())
            } else {
                Ok(good_night(2))
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn full_pipeline_produces_scored_days() {
        let service = SleepScoreService::new(FixedSource(good_night(2)), ScoringPolicy::default());

        let summary = service.compute_weekly_summary(&Utc, now()).await.unwrap();
        assert_eq!(summary.days().len(), 1);

        let day = summary.selected_day().unwrap();
        assert_eq!(day.day, chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(day.total_sleep, TimeDelta::hours(8));
        assert_eq!(day.deep_sleep_pct, 12.5);
        // 8h -> 50, 12.5% deep -> 50
        assert_eq!(day.score, 100);

        assert_eq!(service.latest(), Some(summary));
    }

    #[tokio::test]
    async fn empty_source_yields_empty_summary() {
        let service = SleepScoreService::new(FixedSource(Vec::new()), ScoringPolicy::default());

        let summary = service.compute_weekly_summary(&Utc, now()).await.unwrap();
        assert!(summary.is_empty());
        assert!(summary.selected_day().is_none());
    }

    #[tokio::test]
    async fn permission_denied_propagates_without_publishing() {
        let service = SleepScoreService::new(DeniedSource, ScoringPolicy::default());

        let result = service.compute_weekly_summary(&Utc, now()).await;
        assert!(matches!(
            result,
            Err(PipelineError::Ingest(IngestError::PermissionDenied))
        ));
        assert!(service.latest().is_none());
    }

    #[tokio::test]
    async fn malformed_interval_fails_the_run() {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 6, 0, 0).unwrap();
        let reversed =
            SleepInterval::new(start, start - TimeDelta::hours(1), SleepStage::AsleepCore);
        let service = SleepScoreService::new(FixedSource(vec![reversed]), ScoringPolicy::default());

        let result = service.compute_weekly_summary(&Utc, now()).await;
        assert!(matches!(result, Err(PipelineError::Compute(_))));
        assert!(service.latest().is_none());
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_newer_result() {
        let service = SleepScoreService::new(
            GatedSource {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
            },
            ScoringPolicy::default(),
        );

        let (stale, fresh) = tokio::join!(
            // Started first, finishes last.
            service.compute_weekly_summary(&Utc, now()),
            async {
                let fresh = service.compute_weekly_summary(&Utc, now()).await;
                service.source.gate.notify_one();
                fresh
            }
        );

        let stale = stale.unwrap();
        let fresh = fresh.unwrap();
        assert!(stale.is_empty());
        assert_eq!(fresh.days().len(), 1);

        // The stale run returned its own result but must not have replaced
        // the published one.
        assert_eq!(service.latest(), Some(fresh));
    }

    #[tokio::test]
    async fn subscribers_observe_publication() {
        let service = SleepScoreService::new(FixedSource(good_night(2)), ScoringPolicy::default());
        let mut receiver = service.subscribe();

        assert!(receiver.borrow().summary().is_none());

        service.compute_weekly_summary(&Utc, now()).await.unwrap();
        assert!(receiver.has_changed().unwrap());
        assert!(receiver.borrow_and_update().summary().is_some());
    }

    #[tokio::test]
    async fn select_day_reads_published_summary() {
        let service = SleepScoreService::new(FixedSource(good_night(2)), ScoringPolicy::default());
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();

        assert!(service.select_day(date).is_none());

        service.compute_weekly_summary(&Utc, now()).await.unwrap();
        assert_eq!(service.select_day(date).map(|m| m.score), Some(100));
        assert!(
            service
                .select_day(date - TimeDelta::days(1))
                .is_none()
        );
    }
}
