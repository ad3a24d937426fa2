// Testing utilities and fixtures for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use glucose_guide_data::repository::tests::MockReadingRepository;

use chrono::{Duration, NaiveDate};
use glucose_guide_data::models::reading::DATE_FORMAT;
use glucose_guide_data::{Clock, FixedClock};

use crate::entities::Reading;

/// Calendar day fixtures treat as today (a Sunday)
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 15).unwrap_or_default()
}

/// Clock pinned to [`today`]
pub fn fixed_clock() -> FixedClock {
    FixedClock::on(today())
}

/// Build a reading for `date` with an id derived from the date
pub fn reading_on(date: NaiveDate, value: u32) -> Reading {
    Reading {
        id: format!("reading-{}", date.format(DATE_FORMAT)),
        date: date.format(DATE_FORMAT).to_string(),
        value,
        created_at: fixed_clock().now_millis(),
    }
}

/// Build one reading per value on consecutive days ending at [`today`],
/// newest first
pub fn readings_with_values(values: &[u32]) -> Vec<Reading> {
    let entries: Vec<(i64, u32)> = values
        .iter()
        .enumerate()
        .map(|(days_ago, value)| (days_ago as i64, *value))
        .collect();
    readings_days_ago(today(), &entries)
}

/// Build readings placed `days_ago` days before `today`, in the given order
pub fn readings_days_ago(today: NaiveDate, entries: &[(i64, u32)]) -> Vec<Reading> {
    entries
        .iter()
        .map(|(days_ago, value)| reading_on(today - Duration::days(*days_ago), *value))
        .collect()
}
