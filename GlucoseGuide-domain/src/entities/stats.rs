use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregate summary of a set of readings
///
/// `count == 0` comes with `avg == max == min == 0`; callers that display
/// stats must check `count` rather than treating zero as a measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Mean value in mg/dL, rounded half up
    pub avg: u32,

    /// Highest value in mg/dL
    pub max: u32,

    /// Lowest value in mg/dL
    pub min: u32,

    /// Number of readings summarized
    pub count: usize,
}

impl Stats {
    /// Whether the stats were computed over no readings
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Spread between the highest and lowest value
    pub fn range(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }
}

/// Classification of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseLevel {
    /// Below 100 mg/dL
    Low,

    /// 100 to 140 mg/dL inclusive
    Normal,

    /// Above 140 mg/dL
    High,
}

impl GlucoseLevel {
    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            GlucoseLevel::Low => "Low",
            GlucoseLevel::Normal => "Normal",
            GlucoseLevel::High => "High",
        }
    }
}

/// Named lookback window used to filter readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last 7 days
    #[default]
    Daily,

    /// Last 30 days
    Weekly,

    /// Last 90 days
    Monthly,
}

impl Period {
    /// Every period, in tab order
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    /// Length of the lookback window in whole days
    pub fn window_days(self) -> i64 {
        match self {
            Period::Daily => 7,
            Period::Weekly => 30,
            Period::Monthly => 90,
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown period name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown period: {0}")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}
