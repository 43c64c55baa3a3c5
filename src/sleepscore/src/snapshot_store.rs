use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sleepscore_algos::WeeklySummary;
use sleepscore_types::{DaySnapshot, SummarySnapshot};

/// Projects a weekly summary onto the snapshot records shared with the
/// companion display surface.
pub fn summary_snapshot(summary: &WeeklySummary, last_update: DateTime<Utc>) -> SummarySnapshot {
    let days = summary
        .days()
        .iter()
        .map(|metrics| DaySnapshot {
            day: metrics.day,
            score: metrics.score,
            duration_seconds: metrics.duration_seconds(),
        })
        .collect();

    SummarySnapshot::new(days, last_update)
}

/// Persists the latest snapshot as an opaque JSON blob at a local path. The
/// display surface reads it back and only requests a fresh pipeline run once
/// the snapshot falls out of the freshness window.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(
        &self,
        summary: &WeeklySummary,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SummarySnapshot> {
        let snapshot = summary_snapshot(summary, now);
        let blob = serde_json::to_vec(&snapshot).context("failed to serialize snapshot")?;

        std::fs::write(&self.path, blob)
            .with_context(|| format!("failed to write snapshot to {}", self.path.display()))?;

        Ok(snapshot)
    }

    pub fn load(&self) -> anyhow::Result<Option<SummarySnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let blob = std::fs::read(&self.path)
            .with_context(|| format!("failed to read snapshot from {}", self.path.display()))?;
        let snapshot = serde_json::from_slice(&blob).context("failed to parse snapshot blob")?;

        Ok(Some(snapshot))
    }
}
