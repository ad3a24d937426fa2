//! Display helpers for the stats cards, history list and trend chart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use glucose_guide_data::models::reading::parse_date;
use crate::entities::{GlucoseLevel, Reading, Stats};
use crate::services::classify_level;
use crate::services::insights::{HIGH_THRESHOLD, LOW_THRESHOLD};

/// Lower reference line drawn on the chart
pub const NORMAL_RANGE_LOWER: u32 = LOW_THRESHOLD;

/// Upper reference line drawn on the chart
pub const NORMAL_RANGE_UPPER: u32 = HIGH_THRESHOLD;

/// Bottom of the chart's y axis, in mg/dL
pub const CHART_Y_MIN: u32 = 60;

/// Top of the chart's y axis, in mg/dL
pub const CHART_Y_MAX: u32 = 200;

const LABEL_FORMAT: &str = "%b %-d (%a)";

/// One point of the trend chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Stored `YYYY-MM-DD` date
    pub date: String,

    /// Short axis label, e.g. `Feb 15 (Sun)`
    pub label: String,

    pub value: u32,
    pub level: GlucoseLevel,
}

/// Format a stored date as `Feb 15 (Sun)`; unparseable input is returned
/// unchanged
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(day) => format_day(day),
        None => date.to_string(),
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format(LABEL_FORMAT).to_string()
}

/// Format a stats value for a card; `-` when there is no data
pub fn format_stat_value(value: u32, count: usize) -> String {
    if count == 0 {
        "-".to_string()
    } else {
        format!("{} mg/dL", value)
    }
}

/// Format the average card of `stats`
pub fn format_average(stats: &Stats) -> String {
    format_stat_value(stats.avg, stats.count)
}

/// Chart points for `filtered`, oldest first
///
/// `filtered` is expected newest first, as the repository returns it.
pub fn chart_series(filtered: &[Reading]) -> Vec<ChartPoint> {
    filtered
        .iter()
        .rev()
        .map(|reading| ChartPoint {
            date: reading.date.clone(),
            label: format_date(&reading.date),
            value: reading.value,
            level: classify_level(reading.value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::readings_with_values;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-02-15"), "Feb 15 (Sun)");
        assert_eq!(format_date("2026-12-25"), "Dec 25 (Fri)");
        assert_eq!(format_date("2026-03-01"), "Mar 1 (Sun)");
    }

    #[test]
    fn test_format_date_passes_through_garbage() {
        assert_eq!(format_date("not a date"), "not a date");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_stat_value() {
        assert_eq!(format_stat_value(0, 0), "-");
        assert_eq!(format_stat_value(123, 3), "123 mg/dL");
        assert_eq!(format_average(&Stats::default()), "-");
        assert_eq!(
            format_average(&Stats { avg: 110, max: 120, min: 100, count: 2 }),
            "110 mg/dL"
        );
    }

    #[test]
    fn test_chart_series_is_oldest_first() {
        // newest first: 2026-02-15, 02-14, 02-13
        let readings = readings_with_values(&[150, 120, 90]);
        let series = chart_series(&readings);

        let dates: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-02-13", "2026-02-14", "2026-02-15"]);

        assert_eq!(series[0].label, "Feb 13 (Fri)");
        assert_eq!(series[0].level, GlucoseLevel::Low);
        assert_eq!(series[1].level, GlucoseLevel::Normal);
        assert_eq!(series[2].level, GlucoseLevel::High);
    }

    #[test]
    fn test_chart_bounds_cover_reference_lines() {
        assert!(CHART_Y_MIN < NORMAL_RANGE_LOWER);
        assert!(NORMAL_RANGE_UPPER < CHART_Y_MAX);
    }
}
