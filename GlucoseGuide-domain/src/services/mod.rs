pub mod advice;
pub mod insights;
pub mod readings;
pub mod stats;

// Domain services
// Pure functions over readings, plus validation at the input boundary.

pub use advice::generate_health_advice;
pub use insights::{classify_level, Distribution};
pub use readings::{validate_create_request, ReadingServiceError};
pub use stats::{calculate_stats, filter_by_period, filter_by_period_on};
