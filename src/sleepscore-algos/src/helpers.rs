pub mod format_hm;
pub mod stats;
pub use stats::{mean, mean_deltas, round_float};
