use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use glucose_guide_data::models::reading::parse_date;

pub use glucose_guide_data::models::Reading;

/// Highest value the input form accepts, in mg/dL
pub const MAX_READING_VALUE: u32 = 600;

/// Request payload for recording a blood sugar reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateReadingRequest {
    /// Calendar day of the reading (YYYY-MM-DD)
    #[validate(custom = "validate_reading_date")]
    pub date: String,

    /// Blood sugar in mg/dL
    #[validate(range(min = 1, max = 600, message = "Blood sugar must be between 1 and 600 mg/dL"))]
    pub value: u32,
}

impl CreateReadingRequest {
    pub fn new(date: impl Into<String>, value: u32) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Accept only zero-padded `YYYY-MM-DD` dates that exist on the calendar
fn validate_reading_date(date: &str) -> Result<(), ValidationError> {
    if date.len() == 10 && parse_date(date).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("date_format");
    error.message = Some(Cow::from("Date must be a calendar date in YYYY-MM-DD form"));
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(CreateReadingRequest::new("2026-02-15", 120).validate().is_ok());
        assert!(CreateReadingRequest::new("2026-02-15", MAX_READING_VALUE).validate().is_ok());
    }

    #[test]
    fn test_value_out_of_range() {
        assert!(CreateReadingRequest::new("2026-02-15", 0).validate().is_err());
        assert!(CreateReadingRequest::new("2026-02-15", 601).validate().is_err());
    }

    #[test]
    fn test_date_must_be_padded_calendar_date() {
        assert!(CreateReadingRequest::new("2026-02-2", 120).validate().is_err());
        assert!(CreateReadingRequest::new("2026-02-30", 120).validate().is_err());
        assert!(CreateReadingRequest::new("", 120).validate().is_err());
        assert!(CreateReadingRequest::new("15/02/2026", 120).validate().is_err());
    }
}
