//! SQLite storage collaborator.

mod queries;
mod schema;

pub use schema::SCHEMA;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::models::Stats;

/// Shared database handle. Cloning shares the connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening SQLite database at {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory SQLite database")?;
        Ok(Self::from_connection(conn))
    }

    /// Open the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "lexdesk", "lexdesk")
            .context("could not determine a data directory")?;
        Ok(dirs.data_dir().join("lexdesk.db"))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create tables and the singleton stats row. Safe to run repeatedly.
    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO stats (id, updated_at) VALUES (?1, ?2)",
                params![Stats::ROW_ID, Utc::now()],
            )?;
            if inserted > 0 {
                tracing::info!("Initialized stats row");
            }
            Ok(())
        })?;
        tracing::debug!("Database schema is up to date");
        Ok(())
    }

    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        f(&conn)
    }
}
