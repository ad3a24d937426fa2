pub mod reading;

pub use reading::{LegacyReading, Reading};
