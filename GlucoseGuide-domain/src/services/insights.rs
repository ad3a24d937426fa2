use crate::entities::{GlucoseLevel, Reading};
use crate::services::stats::round_half_up;

/// Readings below this are low, in mg/dL
pub const LOW_THRESHOLD: u32 = 100;

/// Readings above this are high, in mg/dL
pub const HIGH_THRESHOLD: u32 = 140;

/// Classify a single blood sugar value
///
/// Both thresholds belong to the normal band.
pub fn classify_level(value: u32) -> GlucoseLevel {
    if value < LOW_THRESHOLD {
        GlucoseLevel::Low
    } else if value > HIGH_THRESHOLD {
        GlucoseLevel::High
    } else {
        GlucoseLevel::Normal
    }
}

/// Share of readings in each level, as whole percentages
///
/// Each share is rounded on its own, so the three need not add up to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    pub high_pct: u32,
    pub low_pct: u32,
    pub normal_pct: u32,
}

impl Distribution {
    /// Compute the distribution of `readings`; empty input is all zeros
    pub fn of(readings: &[Reading]) -> Self {
        if readings.is_empty() {
            return Self::default();
        }

        let total = readings.len() as u64;
        let count = |level: GlucoseLevel| {
            readings.iter().filter(|r| classify_level(r.value) == level).count() as u64
        };
        let pct = |n: u64| round_half_up(n * 100, total) as u32;

        Self {
            high_pct: pct(count(GlucoseLevel::High)),
            low_pct: pct(count(GlucoseLevel::Low)),
            normal_pct: pct(count(GlucoseLevel::Normal)),
        }
    }
}
