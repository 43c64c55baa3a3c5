pub(crate) mod stage;
pub use stage::SleepStage;

pub(crate) mod interval;
pub use interval::{DayBucket, SleepInterval};

pub(crate) mod snapshot;
pub use snapshot::{DaySnapshot, SummarySnapshot};

pub(crate) mod error;
pub use error::InvalidInterval;
