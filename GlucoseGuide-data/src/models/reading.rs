use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Calendar date format used for the `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage model for a blood sugar reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Unique identifier for the reading
    #[serde(default)]
    pub id: String,

    /// Calendar day of the reading (YYYY-MM-DD, no time zone)
    pub date: String,

    /// Blood sugar in mg/dL
    pub value: u32,

    /// When the reading was recorded, as epoch milliseconds
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

impl Reading {
    /// Parse the `date` field into a calendar date
    ///
    /// Unpadded components such as `2026-02-2` are accepted.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Read a stored element field by field
    ///
    /// Used for entries that do not deserialize as a [`Reading`]. Mistyped
    /// fields fall back to their defaults; `value` is read like a legacy
    /// value and `createdAt` may be fractional or a numeric string. Returns
    /// `None` only when the element is not a JSON object.
    pub fn from_json_lenient(element: &serde_json::Value) -> Option<Self> {
        if !element.is_object() {
            return None;
        }

        let id = match element.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let created_at = element
            .get("createdAt")
            .and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
                serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            })
            .unwrap_or_default();

        let LegacyReading { date, value } = LegacyReading::from_json(element);
        Some(Self { id, date, value, created_at })
    }
}

/// Pre-identity record shape written by the first version of the app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyReading {
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub value: u32,
}

impl LegacyReading {
    /// Read the legacy fields out of an arbitrary JSON element
    ///
    /// Missing or mistyped fields fall back to their defaults instead of
    /// failing; numeric strings and fractional numbers are accepted for
    /// `value`.
    pub fn from_json(element: &serde_json::Value) -> Self {
        let date = element
            .get("date")
            .and_then(|d| d.as_str())
            .unwrap_or_default()
            .to_string();

        let value = element
            .get("value")
            .and_then(|v| match v {
                serde_json::Value::Number(n) => n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.round() as u64)),
                serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            })
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or_default();

        Self { date, value }
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_uses_camel_case_timestamp() {
        let reading = Reading {
            id: "abc".to_string(),
            date: "2026-02-15".to_string(),
            value: 120,
            created_at: 1_771_113_600_000,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["createdAt"], 1_771_113_600_000_i64);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_reading_tolerates_legacy_shape() {
        let reading: Reading = serde_json::from_str(r#"{"date":"2026-02-15","value":120}"#).unwrap();
        assert_eq!(reading.id, "");
        assert_eq!(reading.created_at, 0);
        assert_eq!(reading.value, 120);
    }

    #[test]
    fn test_legacy_from_json_is_lenient() {
        let full = serde_json::json!({"date": "2026-02-15", "value": 120});
        assert_eq!(
            LegacyReading::from_json(&full),
            LegacyReading { date: "2026-02-15".to_string(), value: 120 }
        );

        let fractional = serde_json::json!({"date": "2026-02-15", "value": 119.6});
        assert_eq!(LegacyReading::from_json(&fractional).value, 120);

        let text = serde_json::json!({"date": "2026-02-15", "value": "98"});
        assert_eq!(LegacyReading::from_json(&text).value, 98);

        let garbage = serde_json::json!(42);
        assert_eq!(LegacyReading::from_json(&garbage), LegacyReading::default());
    }

    #[test]
    fn test_lenient_reading_keeps_what_it_can() {
        let element = serde_json::json!({"id": "a", "date": "2026-02-14", "value": 120.5, "createdAt": "17"});
        let reading = Reading::from_json_lenient(&element).unwrap();
        assert_eq!(
            reading,
            Reading { id: "a".to_string(), date: "2026-02-14".to_string(), value: 121, created_at: 17 }
        );

        let sparse = serde_json::json!({"id": 7, "value": -3});
        let reading = Reading::from_json_lenient(&sparse).unwrap();
        assert_eq!((reading.id.as_str(), reading.date.as_str(), reading.value), ("7", "", 0));

        assert_eq!(Reading::from_json_lenient(&serde_json::json!("text")), None);
    }

    #[test]
    fn test_parse_date_accepts_unpadded_day() {
        assert_eq!(parse_date("2026-02-2"), NaiveDate::from_ymd_opt(2026, 2, 2));
        assert_eq!(parse_date("2026-02-10"), NaiveDate::from_ymd_opt(2026, 2, 10));
        assert_eq!(parse_date("not-a-date"), None);
    }
}
