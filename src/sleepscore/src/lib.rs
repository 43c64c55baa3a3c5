#[macro_use]
extern crate log;

mod source;
pub use source::{IngestError, JsonFileSource, SleepDataSource};

mod pipeline;
pub use pipeline::{PipelineError, PublishedSummary, SleepScoreService};

mod snapshot_store;
pub use snapshot_store::{SnapshotStore, summary_snapshot};

mod sample;
pub use sample::{SampleDataSource, generate_sample_intervals};
