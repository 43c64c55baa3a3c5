pub(crate) mod bucketize;
pub use bucketize::bucketize;

pub(crate) mod metrics;
pub use metrics::DayMetrics;

pub(crate) mod score;
pub use score::ScoringPolicy;

pub(crate) mod weekly;
pub use weekly::{WeeklyAverages, WeeklySummary};

pub mod helpers;
