use serde::{Deserialize, Serialize};

/// Sleep stage label attached to each recorded interval, matching the
/// categories exported by the platform health store.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepStage {
    #[serde(rename = "awake")]
    Awake,
    #[serde(rename = "in_bed")]
    InBed,
    #[serde(rename = "asleep_unspecified")]
    AsleepUnspecified,
    #[serde(rename = "asleep_core")]
    AsleepCore,
    #[serde(rename = "asleep_deep")]
    AsleepDeep,
    #[serde(rename = "asleep_rem")]
    AsleepRem,
}

impl SleepStage {
    /// True for every stage that counts towards total sleep duration.
    pub fn is_asleep(self) -> bool {
        matches!(
            self,
            Self::AsleepUnspecified | Self::AsleepCore | Self::AsleepDeep | Self::AsleepRem
        )
    }

    /// True for stages spent in bed without sleeping.
    pub fn is_awake_in_bed(self) -> bool {
        matches!(self, Self::Awake | Self::InBed)
    }
}
