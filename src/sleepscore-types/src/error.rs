use chrono::{DateTime, Utc};
use thiserror::Error;

/// An interval that ends before it starts. The only malformed-input case the
/// pipeline treats as fatal; empty or missing data zero-fills instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("interval ends before it starts: {start} > {end}")]
pub struct InvalidInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
