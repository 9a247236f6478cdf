//! SQLite-backed state storage.
//!
//! Holds the countdown and the timer history as JSON documents in a
//! key-value table, the same shape the page keeps in local storage:
//! - `countdown_timer`: serialized [`CountdownTimer`]
//! - `timer_history`: serialized [`TimerHistory`]

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DatabaseError;
use crate::history::TimerHistory;
use crate::timer::CountdownTimer;

use super::data_dir;

pub const TIMER_KEY: &str = "countdown_timer";
pub const HISTORY_KEY: &str = "timer_history";

/// SQLite database for timer state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/deskclock/deskclock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("deskclock.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Decode a JSON document. Missing or corrupt values yield `None`; a
    /// corrupt one is logged and left for the next save to overwrite.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored state");
                Ok(None)
            }
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(value).map_err(|e| DatabaseError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    /// Stored countdown, or `None` if nothing usable is stored.
    pub fn load_timer(&self) -> Result<Option<CountdownTimer>, DatabaseError> {
        self.load_json(TIMER_KEY)
    }

    pub fn save_timer(&self, timer: &CountdownTimer) -> Result<(), DatabaseError> {
        self.save_json(TIMER_KEY, timer)
    }

    /// Stored history with legacy IDs repaired and the capacity applied.
    /// Repairs are written back immediately.
    pub fn load_history(&self, max_records: usize) -> Result<TimerHistory, DatabaseError> {
        let Some(mut history) = self.load_json::<TimerHistory>(HISTORY_KEY)? else {
            return Ok(TimerHistory::new(max_records));
        };
        let repaired = history.repair_ids();
        let before = history.len();
        history.set_max_records(max_records);
        if repaired > 0 || history.len() != before {
            self.save_history(&history)?;
        }
        Ok(history)
    }

    pub fn save_history(&self, history: &TimerHistory) -> Result<(), DatabaseError> {
        self.save_json(HISTORY_KEY, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::instant;
    use crate::timer::{TimerDuration, TimerPhase};

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn timer_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskclock.db");
        {
            let db = Database::open_at(&path).unwrap();
            let mut timer = CountdownTimer::new(TimerDuration::from_secs(90));
            timer.start(1_000);
            timer.pause(31_000);
            db.save_timer(&timer).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        let timer = db.load_timer().unwrap().unwrap();
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert_eq!(timer.remaining_ms(999_999), 60_000);
    }

    #[test]
    fn corrupt_timer_is_treated_as_missing() {
        let db = Database::open_memory().unwrap();
        db.kv_set(TIMER_KEY, "{not json").unwrap();
        assert!(db.load_timer().unwrap().is_none());
    }

    #[test]
    fn history_roundtrip_applies_capacity() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_history(50).unwrap().is_empty());

        let mut history = TimerHistory::default();
        for i in 0..5 {
            history.add_record_at(1.0, i % 2 == 0, instant(i * 1_000));
        }
        db.save_history(&history).unwrap();

        let loaded = db.load_history(3).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.records()[0], history.records()[0]);
        // The trimmed copy is what is stored now.
        assert_eq!(db.load_history(50).unwrap().len(), 3);
    }

    #[test]
    fn legacy_history_ids_are_repaired_on_load() {
        let db = Database::open_memory().unwrap();
        db.kv_set(
            HISTORY_KEY,
            r#"{"records":[
                {"id":"7","startTime":"2025-08-29T10:00:00Z","duration":5.0},
                {"id":"7","startTime":"2025-08-29T09:00:00Z","duration":3.0}
            ]}"#,
        )
        .unwrap();
        let history = db.load_history(50).unwrap();
        assert_ne!(history.records()[0].id, history.records()[1].id);

        let raw = db.kv_get(HISTORY_KEY).unwrap().unwrap();
        assert!(raw.contains(&history.records()[1].id));
    }
}
