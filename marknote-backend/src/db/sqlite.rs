//! SQLite connection handle and schema setup

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Shared handle to the notes database.
///
/// All access goes through a single connection guarded by a mutex, so every
/// statement (and every transaction) is serialized across request handlers.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create database directory {:?}: {}", parent, e);
                }
            }
        }

        let conn = Connection::open(database_url)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::debug!("SQLite journal mode: {}", mode);
        Self::from_connection(conn)
    }

    /// Fresh private database, used by tests
    #[cfg(test)]
    pub fn in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &Connection) -> SqliteResult<()> {
        // AUTOINCREMENT keeps ids unique for the table's lifetime and gives
        // us a sqlite_sequence row to reset on bulk delete.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL DEFAULT '',
                document TEXT,
                markdown_text TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                report_issues TEXT NOT NULL DEFAULT '[]'
            );
            CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes(created_at);",
        )?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a half-applied
        // transaction behind (rusqlite rolls back on drop), so keep going.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
