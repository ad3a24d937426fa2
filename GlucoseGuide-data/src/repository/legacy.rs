//! One-time upgrade of readings saved before records carried an id and a
//! creation timestamp.
//!
//! Detection looks at the first stored element only and assumes the whole
//! collection shares its shape.

use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::models::reading::{LegacyReading, Reading};
use super::readings::STORAGE_KEY;
use super::storage::StorageService;

/// Store key holding the verbatim pre-migration payload
pub const BACKUP_KEY: &str = "bloodSugarData_backup_v1";

/// Result of a migration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Stored data was absent, empty or already in the current shape
    NotNeeded,
    /// Every stored element was rewritten in the current shape
    Migrated { records: usize },
    /// The backup could not be written, so the stored data was left alone
    BackupFailed,
    /// The backup exists but the migrated collection could not be saved
    SaveFailed { records: usize },
}

/// Legacy data migrator
#[derive(Debug, Clone)]
pub struct LegacyMigrator {
    storage: StorageService,
    clock: Arc<dyn Clock>,
}

impl LegacyMigrator {
    /// Create a migrator over the given storage
    pub fn new(storage: StorageService, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Whether the stored collection is in the legacy shape
    pub fn needs_migration(&self) -> bool {
        match self.load_collection() {
            Some(elements) => elements.first().map(is_legacy_shape).unwrap_or(false),
            None => false,
        }
    }

    /// Upgrade legacy data to the current shape
    ///
    /// Writes the raw stored text to [`BACKUP_KEY`] first. An existing backup
    /// is never overwritten. Calling this again after a successful run does
    /// nothing.
    pub fn migrate(&self) -> MigrationOutcome {
        if !self.needs_migration() {
            debug!("Blood sugar data is already in the current format");
            return MigrationOutcome::NotNeeded;
        }

        let (Some(raw), Some(elements)) = (self.storage.load_raw(STORAGE_KEY), self.load_collection()) else {
            return MigrationOutcome::NotNeeded;
        };

        if self.storage.load_raw(BACKUP_KEY).is_some() {
            warn!("Backup '{}' already exists, keeping the original backup", BACKUP_KEY);
        } else if !self.storage.save_raw(BACKUP_KEY, &raw) {
            error!("Failed to back up blood sugar data, migration aborted");
            return MigrationOutcome::BackupFailed;
        }

        let now = self.clock.now_millis();
        let migrated: Vec<Reading> = elements
            .iter()
            .map(|element| {
                let legacy = LegacyReading::from_json(element);
                Reading {
                    id: Uuid::new_v4().to_string(),
                    date: legacy.date,
                    value: legacy.value,
                    created_at: now,
                }
            })
            .collect();

        let records = migrated.len();
        if !self.storage.save(STORAGE_KEY, &migrated) {
            error!("Failed to save {} migrated blood sugar records", records);
            return MigrationOutcome::SaveFailed { records };
        }

        info!("Migrated {} blood sugar records", records);
        MigrationOutcome::Migrated { records }
    }

    /// Startup entry point: migrate if the stored data needs it
    pub fn auto_migrate(&self) -> MigrationOutcome {
        if !self.needs_migration() {
            return MigrationOutcome::NotNeeded;
        }

        info!("Starting blood sugar data migration");
        self.migrate()
    }

    /// Non-empty stored array, if there is one
    fn load_collection(&self) -> Option<Vec<Value>> {
        match self.storage.load::<Value>(STORAGE_KEY)? {
            Value::Array(elements) if !elements.is_empty() => Some(elements),
            _ => None,
        }
    }
}

/// An element is legacy when `id` or `createdAt` is missing or falsy
fn is_legacy_shape(element: &Value) -> bool {
    !is_truthy(element.get("id")) || !is_truthy(element.get("createdAt"))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use crate::clock::FixedClock;
    use crate::database::{BlobStore, InMemoryBlobStore};

    const NOW: i64 = 1_771_156_800_000;

    fn migrator() -> LegacyMigrator {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()).with_millis(NOW);
        LegacyMigrator::new(StorageService::in_memory(), Arc::new(clock))
    }

    fn store_raw(migrator: &LegacyMigrator, key: &str, value: &Value) {
        migrator.storage.backend().set(key, &value.to_string()).unwrap();
    }

    fn stored(migrator: &LegacyMigrator, key: &str) -> Value {
        serde_json::from_str(&migrator.storage.load_raw(key).unwrap()).unwrap()
    }

    #[test]
    fn test_needs_migration_for_legacy_data() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([
            {"date": "2026-02-15", "value": 120},
            {"date": "2026-02-14", "value": 110}
        ]));
        assert!(migrator.needs_migration());
    }

    #[test]
    fn test_needs_migration_false_for_current_data() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([
            {"id": "1", "date": "2026-02-15", "value": 120, "createdAt": 12345}
        ]));
        assert!(!migrator.needs_migration());
    }

    #[test]
    fn test_needs_migration_false_without_data() {
        let migrator = migrator();
        assert!(!migrator.needs_migration());

        store_raw(&migrator, STORAGE_KEY, &json!([]));
        assert!(!migrator.needs_migration());

        store_raw(&migrator, STORAGE_KEY, &json!({"date": "2026-02-15"}));
        assert!(!migrator.needs_migration());
    }

    #[test]
    fn test_needs_migration_treats_falsy_fields_as_missing() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([
            {"id": "", "date": "2026-02-15", "value": 120, "createdAt": 12345}
        ]));
        assert!(migrator.needs_migration());

        store_raw(&migrator, STORAGE_KEY, &json!([
            {"id": "x", "date": "2026-02-15", "value": 120, "createdAt": 0}
        ]));
        assert!(migrator.needs_migration());
    }

    #[test]
    fn test_needs_migration_only_inspects_first_element() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([
            {"id": "1", "date": "2026-02-15", "value": 120, "createdAt": 12345},
            {"date": "2026-02-14", "value": 110}
        ]));
        assert!(!migrator.needs_migration());
    }

    #[test]
    fn test_migrate_upgrades_every_element() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([
            {"date": "2026-02-15", "value": 120},
            {"date": "2026-02-14", "value": 110}
        ]));

        assert_eq!(migrator.migrate(), MigrationOutcome::Migrated { records: 2 });

        let migrated: Vec<Reading> = migrator.storage.load(STORAGE_KEY).unwrap();
        assert_eq!(migrated.len(), 2);
        assert_eq!(migrated[0].date, "2026-02-15");
        assert_eq!(migrated[0].value, 120);
        assert_eq!(migrated[1].date, "2026-02-14");
        assert_eq!(migrated[1].value, 110);
        assert!(migrated.iter().all(|r| !r.id.is_empty() && r.created_at == NOW));
        assert_ne!(migrated[0].id, migrated[1].id);
    }

    #[test]
    fn test_migrate_writes_verbatim_backup() {
        let migrator = migrator();
        let raw = r#"[{"date":"2026-02-15","value":120}]"#;
        migrator.storage.backend().set(STORAGE_KEY, raw).unwrap();

        migrator.migrate();

        assert_eq!(migrator.storage.load_raw(BACKUP_KEY).as_deref(), Some(raw));
    }

    #[test]
    fn test_migrate_leaves_current_data_untouched() {
        let migrator = migrator();
        let current = json!([
            {"id": "existing-id", "date": "2026-02-15", "value": 120, "createdAt": 12345}
        ]);
        store_raw(&migrator, STORAGE_KEY, &current);

        assert_eq!(migrator.migrate(), MigrationOutcome::NotNeeded);
        assert_eq!(stored(&migrator, STORAGE_KEY), current);
        assert_eq!(migrator.storage.load_raw(BACKUP_KEY), None);
    }

    #[test]
    fn test_migrate_handles_empty_data() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([]));

        assert_eq!(migrator.migrate(), MigrationOutcome::NotNeeded);
        assert_eq!(stored(&migrator, STORAGE_KEY), json!([]));
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let migrator = migrator();
        store_raw(&migrator, STORAGE_KEY, &json!([{"date": "2026-02-15", "value": 120}]));

        assert_eq!(migrator.migrate(), MigrationOutcome::Migrated { records: 1 });
        let after_first = stored(&migrator, STORAGE_KEY);

        assert_eq!(migrator.migrate(), MigrationOutcome::NotNeeded);
        assert_eq!(stored(&migrator, STORAGE_KEY), after_first);
    }

    #[test]
    fn test_migrate_keeps_existing_backup() {
        let migrator = migrator();
        migrator.storage.backend().set(BACKUP_KEY, "original").unwrap();
        store_raw(&migrator, STORAGE_KEY, &json!([{"date": "2026-02-15", "value": 120}]));

        assert_eq!(migrator.migrate(), MigrationOutcome::Migrated { records: 1 });
        assert_eq!(migrator.storage.load_raw(BACKUP_KEY).as_deref(), Some("original"));
    }

    #[test]
    fn test_migrate_aborts_when_backup_does_not_fit() {
        let raw = r#"[{"date":"2026-02-15","value":120}]"#;
        let store = InMemoryBlobStore::new().with_quota(STORAGE_KEY.len() + raw.len() + 4);
        store.set(STORAGE_KEY, raw).unwrap();

        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
        let migrator = LegacyMigrator::new(StorageService::new(Arc::new(store)), Arc::new(clock));

        assert_eq!(migrator.migrate(), MigrationOutcome::BackupFailed);
        assert_eq!(migrator.storage.load_raw(STORAGE_KEY).as_deref(), Some(raw));
        assert!(migrator.needs_migration());
    }

    #[test]
    fn test_auto_migrate() {
        let migrator = migrator();
        assert_eq!(migrator.auto_migrate(), MigrationOutcome::NotNeeded);

        store_raw(&migrator, STORAGE_KEY, &json!([{"date": "2026-02-15", "value": 120}]));
        assert_eq!(migrator.auto_migrate(), MigrationOutcome::Migrated { records: 1 });
        assert_eq!(migrator.auto_migrate(), MigrationOutcome::NotNeeded);
    }
}
