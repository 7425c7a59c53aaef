use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

mod contacts;
mod repository;
mod schema;

pub use repository::{ContactRepository, SaveMode, SqliteContactRepository};
pub use schema::SCHEMA_VERSION;

use crate::error::ContactError;

/// SQLite-backed contact store. The connection is shared behind a mutex so a
/// single `Database` can serve concurrent requests.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `path`, creating it and its parent directories if needed.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        Self::init(conn)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("contactmanager").join("contacts.db"))
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, ContactError> {
        self.conn
            .lock()
            .map_err(|_| ContactError::persistence("database connection lock poisoned"))
    }

    fn migrate(&self) -> Result<()> {
        let mut conn = self.lock()?;
        conn.execute_batch(schema::SCHEMA_VERSION_TABLE)?;

        let version = Self::schema_version(&conn)?;
        if version < 1 {
            // Run migration in a transaction for atomicity
            let tx = conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
                [SCHEMA_VERSION],
            )?;
            tx.commit()?;
        }

        Ok(())
    }

    fn schema_version(conn: &Connection) -> Result<i32> {
        let version = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(version.unwrap_or(0))
    }
}
