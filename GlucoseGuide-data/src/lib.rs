// GlucoseGuide Data
// This crate handles persistence of blood sugar readings

// Blob store backends and store configuration
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Time source shared by the repository, migrator and period filtering
pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::{BlobStore, StoreError};
pub use repository::{
    LegacyMigrator, MigrationOutcome, ReadingRepository, ReadingRepositoryTrait, StorageService,
};
