//! Document Store Connection
//! Mission: Own the single SQLite connection shared by the user and recipe collections

use rusqlite::{ffi, Connection};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (user email, recipe name) is already taken.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),
    #[error("stored document is corrupt: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    /// Unique-constraint violations on `field` become `Duplicate`.
    pub(crate) fn from_write(err: rusqlite::Error, field: &'static str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate(field)
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Shared handle to the backing database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the store named by `connection_string` and bootstrap the schema.
    ///
    /// Accepts `sqlite://<path>`, a bare file path, or `:memory:`.
    pub fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let path = connection_string
            .strip_prefix("sqlite://")
            .unwrap_or(connection_string);

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();

        // Round-trip before anything else so an unusable store fails here.
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

        Self::init_schema(&conn)?;
        info!("Document store ready at {}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Fresh private in-memory store.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::connect(":memory:")
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone TEXT,
                password TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                name TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL,
                ingredients TEXT NOT NULL DEFAULT '[]',
                instructions TEXT NOT NULL DEFAULT '[]'
            )",
            [],
        )?;

        Ok(())
    }

    pub(crate) fn conn(&self) -> &Arc<Mutex<Connection>> {
        &self.conn
    }
}
