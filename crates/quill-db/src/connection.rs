//! libsql connection management.

use libsql::{Builder, Connection};
use tracing::info;

use crate::error::DbError;

/// Configuration for opening the database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Filesystem path of the database file, or `:memory:`.
    pub path: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "quill.db".to_string(),
        }
    }
}

impl DbConfig {
    /// In-memory database. Used by the integration tests; all clones
    /// of the manager's connection share the same data.
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
        }
    }
}

/// Owns the shared connection and hands out clones of it.
#[derive(Clone)]
pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    /// Opens the database at the configured path.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(path = %config.path, "Opening libsql database");

        let db = Builder::new_local(&config.path).build().await?;
        let conn = db.connect()?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Returns a handle to the shared connection. Clones are cheap and
    /// all refer to the same underlying database session.
    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }
}
