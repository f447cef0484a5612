//! String-keyed, string-valued persistent store backed by SQLite
//!
//! All widget state (login flag, gem balances, preferences, OAuth artifacts)
//! lives in one `kv` table. Writes are last-writer-wins; a single process is
//! assumed. Write failures are logged, never raised to callers.

use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::utils::error_handling::safe_lock;

#[derive(Clone)]
pub struct KvStore {
    conn: Arc<Mutex<Connection>>,
}

impl KvStore {
    /// Open (or create) the store in the platform data directory
    pub fn open() -> Result<Self, String> {
        let path = Self::db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data directory: {}", e))?;
        }
        let conn = Connection::open(&path)
            .map_err(|e| format!("Failed to open store at {}: {}", path.display(), e))?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests and as a degraded fallback when the
    /// on-disk database cannot be opened
    pub fn in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("Failed to open in-memory store: {}", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, String> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|e| format!("Failed to create kv table: {}", e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn db_path() -> Result<PathBuf, String> {
        let base = dirs::data_local_dir().ok_or("No local data directory available")?;
        Ok(base.join("hubrs").join("hubrs.db"))
    }

    /// Read a value; `None` when the key is absent or the store is unreadable
    pub fn get(&self, key: &str) -> Option<String> {
        let conn = safe_lock(&self.conn, "KvStore")?;
        match conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(value) => value,
            Err(e) => {
                log::error!("[Store] Read failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Write a value; failures are logged and swallowed
    pub fn set(&self, key: &str, value: &str) {
        let Some(conn) = safe_lock(&self.conn, "KvStore") else {
            return;
        };
        if let Err(e) = conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        ) {
            log::error!("[Store] Write failed for '{}': {}", key, e);
        }
    }

    /// Remove a key; absent keys are a no-op
    pub fn remove(&self, key: &str) {
        let Some(conn) = safe_lock(&self.conn, "KvStore") else {
            return;
        };
        if let Err(e) = conn.execute("DELETE FROM kv WHERE key = ?1", [key]) {
            log::error!("[Store] Delete failed for '{}': {}", key, e);
        }
    }

    /// Convenience flag check: `true` only when the stored value is exactly "true"
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let store = KvStore::in_memory().unwrap();
        store.set("username", "alice");
        assert_eq!(store.get("username"), Some("alice".to_string()));
    }

    #[test]
    fn overwrite_is_last_writer_wins() {
        let store = KvStore::in_memory().unwrap();
        store.set("k", "one");
        store.set("k", "two");
        assert_eq!(store.get("k"), Some("two".to_string()));
    }

    #[test]
    fn missing_key_is_none() {
        let store = KvStore::in_memory().unwrap();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn remove_clears_key() {
        let store = KvStore::in_memory().unwrap();
        store.set("k", "v");
        store.remove("k");
        assert_eq!(store.get("k"), None);
        // removing again is a no-op
        store.remove("k");
    }

    #[test]
    fn flag_requires_exact_true() {
        let store = KvStore::in_memory().unwrap();
        assert!(!store.flag("is_logged_in"));
        store.set("is_logged_in", "True");
        assert!(!store.flag("is_logged_in"));
        store.set("is_logged_in", "true");
        assert!(store.flag("is_logged_in"));
    }
}
