/// Maps per-day metrics to a quality score in `[1, 100]`.
///
/// The scoring formula changed over the product's life; both variants stay
/// available and are selected explicitly. `TwoFactor` is canonical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Duration and deep-sleep percentage, 50 points each.
    #[default]
    TwoFactor,
    /// Legacy formula: duration, deep-sleep percentage and sleep efficiency
    /// weighted a third each. Kept for compatibility and comparison runs.
    ThreeFactor,
}

impl ScoringPolicy {
    const MIN_SCORE: u8 = 1;
    const MAX_SCORE: u8 = 100;

    /// Deterministic tier-table score. Inputs outside their nominal ranges
    /// fall into the lowest tier; the clamp keeps the result in `[1, 100]`
    /// even though both tables already sum inside it.
    pub fn score(self, duration_hours: f64, deep_sleep_pct: f64, sleep_efficiency: f64) -> u8 {
        let total = match self {
            Self::TwoFactor => {
                Self::duration_points(duration_hours) + Self::deep_sleep_points(deep_sleep_pct)
            }
            Self::ThreeFactor => {
                Self::legacy_duration_points(duration_hours)
                    + Self::legacy_deep_sleep_points(deep_sleep_pct)
                    + Self::legacy_efficiency_points(sleep_efficiency)
            }
        };

        total.clamp(Self::MIN_SCORE, Self::MAX_SCORE)
    }

    /// Duration component, max 50 points.
    fn duration_points(hours: f64) -> u8 {
        if hours >= 8.0 {
            50
        } else if hours >= 7.0 {
            40
        } else if hours >= 6.0 {
            30
        } else if hours >= 5.0 {
            20
        } else {
            10
        }
    }

    /// Deep-sleep component, max 50 points.
    fn deep_sleep_points(pct: f64) -> u8 {
        if pct >= 12.0 {
            50
        } else if pct >= 10.0 {
            40
        } else if pct >= 8.0 {
            30
        } else if pct >= 5.0 {
            20
        } else {
            10
        }
    }

    fn legacy_duration_points(hours: f64) -> u8 {
        if hours >= 8.0 {
            33
        } else if hours >= 7.0 {
            28
        } else if hours >= 6.0 {
            21
        } else if hours >= 5.0 {
            14
        } else {
            7
        }
    }

    fn legacy_deep_sleep_points(pct: f64) -> u8 {
        if pct >= 12.0 {
            33
        } else if pct >= 10.0 {
            28
        } else if pct >= 8.0 {
            21
        } else if pct >= 5.0 {
            14
        } else {
            7
        }
    }

    fn legacy_efficiency_points(pct: f64) -> u8 {
        if pct >= 90.0 {
            34
        } else if pct >= 85.0 {
            28
        } else if pct >= 75.0 {
            21
        } else if pct >= 65.0 {
            14
        } else {
            7
        }
    }
}
