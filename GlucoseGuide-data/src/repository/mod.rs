// Repository module structure
mod legacy;
mod readings;
mod storage;

// Re-export commonly used types
pub use legacy::{LegacyMigrator, MigrationOutcome, BACKUP_KEY};
pub use readings::{sort_newest_first, ReadingRepository, ReadingRepositoryTrait, STORAGE_KEY};
pub use storage::StorageService;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use readings::tests;
