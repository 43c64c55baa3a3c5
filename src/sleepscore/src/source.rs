use std::path::PathBuf;

use chrono::{DateTime, Utc};
use sleepscore_types::SleepInterval;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{self:?}")]
pub enum IngestError {
    /// Authorization against the health store was not granted.
    PermissionDenied,
    /// The platform reports no sleep data capability at all.
    DataUnavailable,
    /// The export exists but cannot be parsed.
    Malformed(String),
    Io(#[from] std::io::Error),
}

/// Boundary to the platform health store. One asynchronous query per
/// pipeline run; zero returned intervals is not an error.
#[allow(async_fn_in_trait)]
pub trait SleepDataSource {
    async fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepInterval>, IngestError>;
}

/// Reads a sleep-interval export (JSON array of intervals) from disk and
/// serves the slice of it whose starts fall inside the queried range.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SleepDataSource for JsonFileSource {
    async fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepInterval>, IngestError> {
        if !self.path.exists() {
            warn!("interval export not found at {}", self.path.display());
            return Err(IngestError::DataUnavailable);
        }

        let bytes = std::fs::read(&self.path)?;
        let intervals: Vec<SleepInterval> = serde_json::from_slice(&bytes)
            .map_err(|error| IngestError::Malformed(error.to_string()))?;

        Ok(intervals
            .into_iter()
            .filter(|interval| interval.start >= start && interval.start < end)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sleepscore_types::SleepStage;

    use super::*;

    fn write_export(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sleepscore-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_file_is_data_unavailable() {
        let source = JsonFileSource::new("/nonexistent/sleep-export.json");
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();

        let result = source.query(start, end).await;
        assert!(matches!(result, Err(IngestError::DataUnavailable)));
    }

    #[tokio::test]
    async fn garbage_file_is_malformed() {
        let path = write_export("garbage.json", "not json at all");
        let source = JsonFileSource::new(&path);
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();

        let result = source.query(start, end).await;
        assert!(matches!(result, Err(IngestError::Malformed(_))));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn export_filtered_to_requested_range() {
        let inside = SleepInterval::new(
            Utc.with_ymd_and_hms(2025, 3, 2, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 3, 6, 0, 0).unwrap(),
            SleepStage::AsleepCore,
        );
        let outside = SleepInterval::new(
            Utc.with_ymd_and_hms(2025, 2, 1, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 2, 6, 0, 0).unwrap(),
            SleepStage::AsleepCore,
        );

        let json = serde_json::to_string(&vec![inside, outside]).unwrap();
        let path = write_export("filter.json", &json);
        let source = JsonFileSource::new(&path);

        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();
        let intervals = source.query(start, end).await.unwrap();

        assert_eq!(intervals, vec![inside]);

        std::fs::remove_file(path).ok();
    }
}
