//! SQLite-based profile storage.
//!
//! Provides persistent storage for:
//! - User profiles, one JSON document per user tag
//! - Key-value store for application state (the study timer)

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations, ProfileStore};
use crate::error::{DatabaseError, Result};
use crate::profile::Profile;

/// SQLite database holding every user's profile.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/studyquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_path(&data_dir()?.join("studyquest.db"))
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Raw JSON stored for `tag`.
    pub fn profile_json(&self, tag: &str) -> Result<Option<String>> {
        let data = self
            .conn
            .query_row("SELECT data FROM profiles WHERE tag = ?1", params![tag], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(data)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

impl ProfileStore for Database {
    /// A row that no longer parses loads as a fresh profile.
    fn get(&self, user: &str) -> Result<Option<Profile>> {
        let Some(data) = self.profile_json(user)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Profile>(&data) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(user, error = %e, "stored profile is unreadable, starting from defaults");
                Ok(Some(Profile::default()))
            }
        }
    }

    fn put(&mut self, user: &str, profile: &Profile) -> Result<()> {
        let data = serde_json::to_string(profile)?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO profiles (tag, data, updated_at, created_at) VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(tag) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
                params![user, data, now],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn users(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM profiles ORDER BY tag")
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(DatabaseError::from)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(DatabaseError::from)?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_roundtrip() {
        let mut db = Database::open_memory().unwrap();
        let profile = Profile {
            points: 120,
            level: 2,
            ..Profile::default()
        };
        db.put("Owl#1234", &profile).unwrap();
        assert_eq!(db.get("Owl#1234").unwrap(), Some(profile.clone()));

        let updated = Profile { points: 300, ..profile };
        db.put("Owl#1234", &updated).unwrap();
        assert_eq!(db.get("Owl#1234").unwrap().unwrap().points, 300);
        assert_eq!(db.users().unwrap(), vec!["Owl#1234"]);
    }

    #[test]
    fn unreadable_profile_loads_default() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO profiles (tag, data, updated_at) VALUES ('bad#1', 'not json', 'now')",
                [],
            )
            .unwrap();
        assert_eq!(db.get("bad#1").unwrap(), Some(Profile::default()));
        assert_eq!(db.get("nobody#1").unwrap(), None);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn open_path_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyquest.db");
        {
            let mut db = Database::open_path(&path).unwrap();
            db.put("Owl#1234", &Profile::default()).unwrap();
        }
        let db = Database::open_path(&path).unwrap();
        assert_eq!(db.users().unwrap(), vec!["Owl#1234"]);
    }
}
