// GlucoseGuide Domain
// This crate contains the business logic for the GlucoseGuide application

// Domain entities and value objects
pub mod entities;

// Services that implement business logic
pub mod services;

// View state held by the presentation root
pub mod dashboard;

// Display helpers for the presentation layer
pub mod presentation;

// Application startup
pub mod bootstrap;

// Tracing subscriber setup
pub mod logging;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;

// Re-export the data layer for convenience
pub use glucose_guide_data as data;

pub use bootstrap::GlucoseGuide;
pub use dashboard::GlucoseDashboard;
pub use presentation::ChartPoint;
pub use entities::{
    AdviceStatus, AdviceTip, CreateReadingRequest, GlucoseLevel, HealthAdvice, Period, Reading,
    Stats, TipSeverity,
};
