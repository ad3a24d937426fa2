// Domain entities and value objects
pub mod advice;
pub mod reading;
pub mod stats;

// Re-export common types for easier imports
pub use advice::{AdviceStatus, AdviceTip, HealthAdvice, TipSeverity};
pub use reading::{CreateReadingRequest, Reading};
pub use stats::{GlucoseLevel, ParsePeriodError, Period, Stats};
