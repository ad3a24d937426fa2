use std::cmp::Ordering;
use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::models::reading::Reading;
use super::storage::StorageService;

/// Store key holding the reading collection
pub const STORAGE_KEY: &str = "bloodSugarData";

/// Repository trait for blood sugar readings
///
/// The repository does not validate `value`; callers check input at the
/// presentation boundary before calling [`ReadingRepositoryTrait::add`].
pub trait ReadingRepositoryTrait {
    /// All readings, newest date first
    fn get_all(&self) -> Vec<Reading>;

    /// Record `value` for `date`, replacing the value of an existing reading
    /// for the same date
    fn add(&self, date: &str, value: u32) -> Reading;

    /// Delete the reading with `id`; unknown ids are ignored
    fn delete(&self, id: &str);
}

/// Repository for blood sugar readings persisted through a [`StorageService`]
#[derive(Debug, Clone)]
pub struct ReadingRepository {
    storage: StorageService,
    clock: Arc<dyn Clock>,
}

impl ReadingRepository {
    /// Create a new repository
    pub fn new(storage: StorageService, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Create a repository stamped by the system clock
    pub fn with_system_clock(storage: StorageService) -> Self {
        Self::new(storage, Arc::new(SystemClock))
    }

    /// The underlying storage adapter
    pub fn storage(&self) -> &StorageService {
        &self.storage
    }

    /// Stored readings, or `None` when the key holds JSON that is not a
    /// reading collection and must not be overwritten
    ///
    /// Elements that do not fit [`Reading`] exactly are read field by field,
    /// so one malformed entry never hides the rest of the collection.
    fn load_readings(&self) -> Option<Vec<Reading>> {
        let elements = match self.storage.load::<Value>(STORAGE_KEY) {
            None | Some(Value::Null) => return Some(Vec::new()),
            Some(Value::Array(elements)) => elements,
            Some(other) => {
                error!("Stored blood sugar data is not a list: {}", other);
                return None;
            }
        };

        let readings = elements
            .into_iter()
            .filter_map(|element| match serde_json::from_value::<Reading>(element.clone()) {
                Ok(reading) => Some(reading),
                Err(e) => {
                    warn!("Reading stored blood sugar entry leniently ({}): {}", e, element);
                    let reading = Reading::from_json_lenient(&element);
                    if reading.is_none() {
                        warn!("Skipping stored blood sugar entry that is not an object: {}", element);
                    }
                    reading
                }
            })
            .collect();
        Some(readings)
    }

    fn persist(&self, readings: &[Reading]) {
        if !self.storage.save(STORAGE_KEY, readings) {
            warn!("Failed to persist {} blood sugar readings", readings.len());
        }
    }
}

impl ReadingRepositoryTrait for ReadingRepository {
    fn get_all(&self) -> Vec<Reading> {
        let mut readings = self.load_readings().unwrap_or_default();
        sort_newest_first(&mut readings);
        readings
    }

    fn add(&self, date: &str, value: u32) -> Reading {
        let now = self.clock.now_millis();
        let Some(mut readings) = self.load_readings() else {
            error!("Not saving reading for {}: stored blood sugar data is unreadable", date);
            return Reading {
                id: Uuid::new_v4().to_string(),
                date: date.to_string(),
                value,
                created_at: now,
            };
        };
        sort_newest_first(&mut readings);

        // Same date: update in place and keep the id
        if let Some(existing) = readings.iter_mut().find(|r| r.date == date) {
            existing.value = value;
            existing.created_at = now;
            let updated = existing.clone();
            debug!("Updated blood sugar reading for {}: id={}", date, updated.id);
            self.persist(&readings);
            return updated;
        }

        let reading = Reading {
            id: Uuid::new_v4().to_string(),
            date: date.to_string(),
            value,
            created_at: now,
        };
        debug!("Adding blood sugar reading for {}: id={}", date, reading.id);

        readings.push(reading.clone());
        sort_newest_first(&mut readings);
        self.persist(&readings);

        reading
    }

    fn delete(&self, id: &str) {
        let Some(mut readings) = self.load_readings() else {
            error!("Not deleting reading id={}: stored blood sugar data is unreadable", id);
            return;
        };
        sort_newest_first(&mut readings);
        let before = readings.len();
        readings.retain(|r| r.id != id);

        if readings.len() == before {
            debug!("No blood sugar reading with id={}", id);
        } else {
            debug!("Deleted blood sugar reading id={}", id);
        }

        self.persist(&readings);
    }
}

/// Sort readings by calendar date, newest first
///
/// Dates are compared as parsed dates, not strings. Readings whose date does
/// not parse go last and keep their relative order.
pub fn sort_newest_first(readings: &mut [Reading]) {
    readings.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Mock reading repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// List-backed implementation of [`ReadingRepositoryTrait`] with no
    /// persistence
    #[derive(Debug, Default)]
    pub struct MockReadingRepository {
        readings: Mutex<Vec<Reading>>,
    }

    impl MockReadingRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined readings
        pub fn with_readings(mut readings: Vec<Reading>) -> Self {
            sort_newest_first(&mut readings);
            Self { readings: Mutex::new(readings) }
        }
    }

    impl ReadingRepositoryTrait for MockReadingRepository {
        fn get_all(&self) -> Vec<Reading> {
            self.readings.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn add(&self, date: &str, value: u32) -> Reading {
            let mut readings = match self.readings.lock() {
                Ok(readings) => readings,
                Err(poisoned) => poisoned.into_inner(),
            };

            if let Some(existing) = readings.iter_mut().find(|r| r.date == date) {
                existing.value = value;
                return existing.clone();
            }

            let reading = Reading {
                id: Uuid::new_v4().to_string(),
                date: date.to_string(),
                value,
                created_at: 0,
            };
            readings.push(reading.clone());
            sort_newest_first(&mut readings);
            reading
        }

        fn delete(&self, id: &str) {
            if let Ok(mut readings) = self.readings.lock() {
                readings.retain(|r| r.id != id);
            }
        }
    }

    #[cfg(test)]
    fn repository_at(millis: i64) -> ReadingRepository {
        let day = chrono::NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        let clock = crate::clock::FixedClock::on(day).with_millis(millis);
        ReadingRepository::new(StorageService::in_memory(), Arc::new(clock))
    }

    #[cfg(test)]
    fn reading(date: &str) -> Reading {
        Reading {
            id: date.to_string(),
            date: date.to_string(),
            value: 100,
            created_at: 1,
        }
    }

    #[test]
    fn test_get_all_empty_initially() {
        let repo = repository_at(1_000);
        assert!(repo.get_all().is_empty());
    }

    #[test]
    fn test_add_new_reading() {
        let repo = repository_at(1_000);
        let added = repo.add("2026-02-15", 120);

        assert!(!added.id.is_empty());
        assert_eq!(added.date, "2026-02-15");
        assert_eq!(added.value, 120);
        assert_eq!(added.created_at, 1_000);

        let all = repo.get_all();
        assert_eq!(all, vec![added]);
    }

    #[test]
    fn test_add_same_date_updates_in_place() {
        let repo = repository_at(1_000);
        let first = repo.add("2026-02-15", 120);

        let later = crate::clock::FixedClock::on(chrono::NaiveDate::from_ymd_opt(2026, 2, 15).unwrap())
            .with_millis(2_000);
        let repo = ReadingRepository::new(repo.storage().clone(), Arc::new(later));
        let second = repo.add("2026-02-15", 130);

        assert_eq!(second.id, first.id);
        assert_eq!(second.value, 130);
        assert_eq!(second.created_at, 2_000);

        let all = repo.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, 130);
        assert_eq!(all[0].id, first.id);
    }

    #[test]
    fn test_add_distinct_dates_sorted_newest_first() {
        let repo = repository_at(1_000);
        repo.add("2026-02-13", 100);
        repo.add("2026-02-15", 120);
        repo.add("2026-02-14", 110);

        let all = repo.get_all();
        let dates: Vec<&str> = all.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-02-15", "2026-02-14", "2026-02-13"]);
        let values: Vec<u32> = all.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![120, 110, 100]);
    }

    #[test]
    fn test_delete_by_id() {
        let repo = repository_at(1_000);
        let added = repo.add("2026-02-15", 120);
        repo.delete(&added.id);
        assert!(repo.get_all().is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let repo = repository_at(1_000);
        let added = repo.add("2026-02-15", 120);
        repo.delete("non-existent");

        assert_eq!(repo.get_all(), vec![added]);
    }

    #[test]
    fn test_sort_compares_dates_not_strings() {
        let mut readings = vec![reading("2026-02-2"), reading("2026-02-10")];
        sort_newest_first(&mut readings);
        assert_eq!(readings[0].date, "2026-02-10");
        assert_eq!(readings[1].date, "2026-02-2");
    }

    #[test]
    fn test_sort_puts_unparseable_dates_last() {
        let mut readings = vec![reading("garbage"), reading("2026-01-01"), reading("2026-03-01")];
        sort_newest_first(&mut readings);
        let dates: Vec<&str> = readings.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-01-01", "garbage"]);
    }

    #[test]
    fn test_persisted_under_fixed_key() {
        let repo = repository_at(1_000);
        repo.add("2026-02-15", 120);

        let raw = repo.storage().load_raw(STORAGE_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["date"], "2026-02-15");
        assert_eq!(json[0]["value"], 120);
        assert_eq!(json[0]["createdAt"], 1_000);
    }

    #[test]
    fn test_failed_save_keeps_previous_data() {
        use crate::database::InMemoryBlobStore;

        let store = InMemoryBlobStore::new().with_quota(300);
        let storage = StorageService::new(Arc::new(store));
        let repo = ReadingRepository::with_system_clock(storage);

        let first = repo.add("2026-02-15", 120);
        let second = repo.add("2026-02-14", 110);
        // Each reading serializes to roughly 100 bytes, so the third write fails
        let third = repo.add("2026-02-13", 100);
        assert_eq!(third.value, 100);

        let all = repo.get_all();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    }

    #[cfg(test)]
    fn seeded_repository(raw: &str) -> ReadingRepository {
        let repo = repository_at(1_000);
        assert!(repo.storage().save_raw(STORAGE_KEY, raw));
        repo
    }

    #[test]
    fn test_malformed_entry_does_not_hide_the_rest() {
        let repo = seeded_repository(
            r#"[{"id":"a","date":"2026-02-14","value":120.5,"createdAt":1},
                {"id":"b","date":"2026-02-13","value":110,"createdAt":1}]"#,
        );

        let before = repo.get_all();
        let ids: Vec<&str> = before.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(before[0].value, 121);

        let added = repo.add("2026-02-15", 130);

        let after = repo.get_all();
        let ids: Vec<&str> = after.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![added.id.as_str(), "a", "b"]);
        assert_eq!(after[2].value, 110);
    }

    #[test]
    fn test_same_date_update_of_malformed_entry_keeps_id() {
        let repo = seeded_repository(
            r#"[{"id":"a","date":"2026-02-14","value":-5,"createdAt":"yesterday"},
                {"id":"b","date":"2026-02-13","value":110,"createdAt":1}]"#,
        );

        let updated = repo.add("2026-02-14", 118);
        assert_eq!(updated.id, "a");

        let all = repo.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!((all[0].id.as_str(), all[0].value, all[0].created_at), ("a", 118, 1_000));
        assert_eq!(all[1].id, "b");
    }

    #[test]
    fn test_entry_without_date_survives_delete() {
        let repo = seeded_repository(
            r#"[{"id":"a","date":"2026-02-14","value":120,"createdAt":1},
                {"id":"b","value":110,"createdAt":1}]"#,
        );

        repo.delete("a");

        let all = repo.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!((all[0].id.as_str(), all[0].date.as_str(), all[0].value), ("b", "", 110));
    }

    #[test]
    fn test_non_list_payload_is_never_overwritten() {
        let raw = r#"{"readings":[{"id":"a","date":"2026-02-14","value":120,"createdAt":1}]}"#;
        let repo = seeded_repository(raw);

        assert!(repo.get_all().is_empty());
        let reading = repo.add("2026-02-15", 130);
        assert_eq!(reading.value, 130);
        repo.delete("a");

        assert_eq!(repo.storage().load_raw(STORAGE_KEY).as_deref(), Some(raw));
    }

    #[test]
    fn test_mock_repository_behaves_like_a_list() {
        let repo = MockReadingRepository::with_readings(vec![reading("2026-02-13"), reading("2026-02-15")]);
        assert_eq!(repo.get_all()[0].date, "2026-02-15");

        let added = repo.add("2026-02-14", 90);
        assert_eq!(repo.get_all().len(), 3);

        repo.delete(&added.id);
        assert_eq!(repo.get_all().len(), 2);
    }
}
