use chrono::NaiveDate;
use tracing::debug;

use glucose_guide_data::Clock;
use crate::entities::{Period, Reading, Stats};

/// `numerator / denominator` rounded to the nearest integer, ties up
///
/// Exact integer arithmetic, so `x.5` always rounds up. `denominator` must
/// be non-zero.
pub fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Compute mean, extremes and count of `readings`
pub fn calculate_stats(readings: &[Reading]) -> Stats {
    if readings.is_empty() {
        return Stats::default();
    }

    let sum: u64 = readings.iter().map(|r| u64::from(r.value)).sum();
    let max = readings.iter().map(|r| r.value).max().unwrap_or_default();
    let min = readings.iter().map(|r| r.value).min().unwrap_or_default();
    let count = readings.len();

    Stats {
        avg: round_half_up(sum, count as u64) as u32,
        max,
        min,
        count,
    }
}

/// Keep readings that fall inside `period`, ending today by `clock`
pub fn filter_by_period(readings: &[Reading], period: Period, clock: &dyn Clock) -> Vec<Reading> {
    filter_by_period_on(readings, period, clock.today())
}

/// Keep readings whose date is fewer than `period.window_days()` days before
/// `today`
///
/// Future-dated readings are kept. Readings whose date does not parse are
/// dropped. Input order is preserved.
pub fn filter_by_period_on(readings: &[Reading], period: Period, today: NaiveDate) -> Vec<Reading> {
    let window = period.window_days();

    let filtered: Vec<Reading> = readings
        .iter()
        .filter(|reading| match reading.parsed_date() {
            Some(date) => (today - date).num_days() < window,
            None => false,
        })
        .cloned()
        .collect();

    debug!(
        "Filtered {} of {} readings for {} period ending {}",
        filtered.len(),
        readings.len(),
        period,
        today
    );
    filtered
}
