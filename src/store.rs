use crate::payload::RegistrationRecord;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed key of the single registration slot
pub const STORAGE_KEY: &str = "pmb_last_registration_v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("failed to serialize registration: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// KEY-VALUE BACKENDS
// ============================================================================

/// String key-value persistence (get / set / remove)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Process-local backend; contents vanish with the value
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite backend: one `kv_store` table, survives restarts
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for crash recovery
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Number of stored keys
    pub fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count)
    }
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// REGISTRATION SLOT
// ============================================================================

/// Single-slot store for the last successful registration
pub struct RegistrationStore<S> {
    backend: S,
}

impl<S: KeyValueStore> RegistrationStore<S> {
    pub fn new(backend: S) -> Self {
        RegistrationStore { backend }
    }

    /// Serialize and write, overwriting any previous record
    pub fn save(&mut self, record: &RegistrationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.backend.set(STORAGE_KEY, &json)?;
        debug!(key = STORAGE_KEY, bytes = json.len(), "registration saved");
        Ok(())
    }

    /// Read the stored record. Absent and unreadable data both yield `None`.
    pub fn load(&self) -> Result<Option<RegistrationRecord>, StoreError> {
        let Some(raw) = self.backend.get(STORAGE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(key = STORAGE_KEY, error = %err, "stored registration is corrupt, treating as absent");
                Ok(None)
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(STORAGE_KEY)?;
        debug!(key = STORAGE_KEY, "registration cleared");
        Ok(())
    }

    /// True when a readable record occupies the slot
    pub fn has_record(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.is_some())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::tests::sample_record;
    use pretty_assertions::assert_eq;

    fn backends() -> Vec<(&'static str, Box<dyn KeyValueStore>)> {
        vec![
            ("memory", Box::new(MemoryStore::new()) as Box<dyn KeyValueStore>),
            ("sqlite", Box::new(SqliteStore::open_in_memory().unwrap()) as Box<dyn KeyValueStore>),
        ]
    }

    #[test]
    fn test_save_then_load_round_trip() {
        for (name, backend) in backends() {
            let mut store = RegistrationStore::new(backend);
            let record = sample_record();

            store.save(&record).unwrap();
            assert_eq!(store.load().unwrap(), Some(record), "backend {name}");
        }
    }

    #[test]
    fn test_load_empty_slot() {
        for (name, backend) in backends() {
            let store = RegistrationStore::new(backend);
            assert_eq!(store.load().unwrap(), None, "backend {name}");
            assert!(!store.has_record().unwrap());
        }
    }

    #[test]
    fn test_corrupt_data_is_treated_as_absent() {
        for (name, mut backend) in backends() {
            backend.set(STORAGE_KEY, "{not json").unwrap();

            let store = RegistrationStore::new(backend);
            assert_eq!(store.load().unwrap(), None, "backend {name}");
        }

        let mut backend = MemoryStore::new();
        backend
            .set(STORAGE_KEY, r#"{"fullName":"Budi","nim":"1234567890"}"#)
            .unwrap();
        assert_eq!(RegistrationStore::new(backend).load().unwrap(), None);
    }

    #[test]
    fn test_save_overwrites_single_slot() {
        let mut store = RegistrationStore::new(SqliteStore::open_in_memory().unwrap());
        let first = sample_record();
        store.save(&first).unwrap();
        store.save(&first).unwrap();

        assert_eq!(store.backend().count().unwrap(), 1);
    }

    #[test]
    fn test_clear_removes_record() {
        for (name, backend) in backends() {
            let mut store = RegistrationStore::new(backend);
            store.save(&sample_record()).unwrap();
            store.clear().unwrap();

            assert_eq!(store.load().unwrap(), None, "backend {name}");
            // clearing an empty slot is fine
            store.clear().unwrap();
        }
    }

    #[test]
    fn test_stored_json_uses_wire_names() {
        let mut store = RegistrationStore::new(MemoryStore::new());
        store.save(&sample_record()).unwrap();

        let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["nim"], "2025101234");
        assert_eq!(value["fullName"], "Siti Nur Aisyah");
        assert_eq!(value["submittedAt"], "2026-10-18T05:30:00.000Z");
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registration.db");
        let record = sample_record();

        {
            let mut store = RegistrationStore::new(SqliteStore::open(&path).unwrap());
            store.save(&record).unwrap();
        }

        let reopened = RegistrationStore::new(SqliteStore::open(&path).unwrap());
        assert_eq!(reopened.load().unwrap(), Some(record));
    }
}
