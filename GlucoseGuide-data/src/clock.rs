//! Wall-clock access for code that stamps or filters readings.
//!
//! Every read of "now" goes through a [`Clock`] so that tests can pin time
//! instead of racing the system clock.

use chrono::{Local, NaiveDate, TimeZone, Utc};

/// Source of the current instant and the current local calendar day
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time as epoch milliseconds
    fn now_millis(&self) -> i64;

    /// Current calendar day in local time, time-of-day stripped
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a fixed day and instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
    now_millis: i64,
}

impl FixedClock {
    /// Freeze the clock at noon UTC of the given day
    pub fn on(today: NaiveDate) -> Self {
        let now_millis = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis())
            .unwrap_or_default();
        Self { today, now_millis }
    }

    /// Override the instant while keeping the calendar day
    pub fn with_millis(mut self, now_millis: i64) -> Self {
        self.now_millis = now_millis;
        self
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
