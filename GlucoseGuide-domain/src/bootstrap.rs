use std::sync::Arc;
use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::{info, warn};

use glucose_guide_data::database::{open_store, StoreConfig};
use glucose_guide_data::{
    Clock, LegacyMigrator, MigrationOutcome, ReadingRepository, StorageService, SystemClock,
};
use crate::dashboard::GlucoseDashboard;

/// Application root: the opened store, its one-time migration result and the
/// dashboard built over it
#[derive(Debug)]
pub struct GlucoseGuide {
    dashboard: GlucoseDashboard<ReadingRepository>,
    migration: MigrationOutcome,
}

impl GlucoseGuide {
    /// Start from `.env` and the process environment with the system clock
    pub fn from_env() -> Result<Self> {
        if dotenv().is_err() {
            info!(".env file not found, using process environment");
        }

        let config = StoreConfig::from_env().context("Failed to read store configuration")?;
        Self::open(&config)
    }

    /// Start from an explicit store configuration with the system clock
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let backend = open_store(config)
            .with_context(|| format!("Failed to open {:?} store", config.store_type))?;
        Ok(Self::with_store(StorageService::new(backend), Arc::new(SystemClock)))
    }

    /// Start over an already opened store
    ///
    /// Runs the legacy migration once, then performs the initial load.
    pub fn with_store(storage: StorageService, clock: Arc<dyn Clock>) -> Self {
        let migration = LegacyMigrator::new(storage.clone(), clock.clone()).auto_migrate();
        match migration {
            MigrationOutcome::BackupFailed | MigrationOutcome::SaveFailed { .. } => {
                warn!("Legacy migration did not complete: {:?}", migration);
            }
            _ => info!("Legacy migration: {:?}", migration),
        }

        let repository = ReadingRepository::new(storage, clock.clone());
        let mut dashboard = GlucoseDashboard::new(repository, clock);
        dashboard.load();

        Self { dashboard, migration }
    }

    pub fn dashboard(&self) -> &GlucoseDashboard<ReadingRepository> {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut GlucoseDashboard<ReadingRepository> {
        &mut self.dashboard
    }

    /// What the startup migration did
    pub fn migration(&self) -> MigrationOutcome {
        self.migration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glucose_guide_data::database::StoreType;
    use glucose_guide_data::repository::STORAGE_KEY;
    use crate::testing::fixed_clock;

    #[test]
    fn test_fresh_store_starts_empty() {
        let guide = GlucoseGuide::with_store(StorageService::in_memory(), Arc::new(fixed_clock()));
        assert_eq!(guide.migration(), MigrationOutcome::NotNeeded);
        assert!(guide.dashboard().records().is_empty());
    }

    #[test]
    fn test_open_memory_config() {
        let config = StoreConfig {
            store_type: StoreType::Memory,
            ..StoreConfig::default()
        };
        let mut guide = GlucoseGuide::open(&config).unwrap();
        guide.dashboard_mut().add_record("2026-02-15", 120);
        assert_eq!(guide.dashboard().records().len(), 1);
        assert!(guide
            .dashboard()
            .repository()
            .storage()
            .load_raw(STORAGE_KEY)
            .is_some());
    }
}
