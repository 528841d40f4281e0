//! `SQLite` backend for meta entry storage.
//!
//! Owns its connection (injected at construction, never fetched from
//! ambient state) and bootstraps the schema on open. Timestamps are
//! assigned server-side with `datetime('now')`: the creation timestamp by
//! column default at insert, `updated_at` by the update statement only.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{MetaRow, OwnerId};
use crate::{Error, Result};

use super::tables::TableResolver;
use super::traits::MetaBackend;

/// Logical name of the meta table, before prefix resolution.
const META_TABLE: &str = "user_meta";

/// SQLite-based meta entry storage backend.
///
/// The physical table name is resolved once at construction; it is the
/// only text interpolated into SQL, with every value bound as a statement
/// parameter.
pub struct SqliteMetaBackend {
    /// Database connection (mutex for interior mutability).
    conn: Mutex<Connection>,
    /// Resolved physical table name.
    table: String,
}

impl SqliteMetaBackend {
    /// Opens (or creates) a database at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `SQLite` database file
    /// * `resolver` - Table name resolver carrying the deployment prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: impl AsRef<Path>, resolver: &TableResolver) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| Error::OperationFailed {
            operation: "open_meta_database".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_connection(conn, resolver)
    }

    /// Creates an in-memory backend (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_meta_database_memory".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_connection(conn, &TableResolver::default())
    }

    /// Wraps an already-opened connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be initialized.
    pub fn from_connection(conn: Connection, resolver: &TableResolver) -> Result<Self> {
        let backend = Self {
            conn: Mutex::new(conn),
            table: resolver.resolve(META_TABLE),
        };
        backend.initialize_schema()?;
        Ok(backend)
    }

    /// Initializes the database schema.
    ///
    /// `(user_id, name)` carries no UNIQUE constraint: duplicate pairs are
    /// a supported shape, and the index exists purely for lookup.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute_batch(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                timestamp TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_owner_name
                ON {table}(user_id, name);
            ",
            table = self.table,
        ))
        .map_err(|e| Error::OperationFailed {
            operation: "initialize_meta_schema".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    /// Locks the connection, mapping poisoning into a storage error.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| Error::OperationFailed {
            operation: "lock_connection".to_string(),
            cause: e.to_string(),
        })
    }

    /// Maps a result row to a [`MetaRow`].
    fn row_to_meta(row: &rusqlite::Row<'_>) -> rusqlite::Result<MetaRow> {
        Ok(MetaRow {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            value: row.get(3)?,
            timestamp: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl MetaBackend for SqliteMetaBackend {
    fn exists(&self, owner: OwnerId, name: &str) -> Result<bool> {
        let conn = self.lock_conn()?;

        let count: i64 = conn
            .query_row(
                &format!(
                    "SELECT COUNT(*) FROM {} WHERE user_id = ?1 AND name = ?2",
                    self.table
                ),
                params![owner.get(), name],
                |row| row.get(0),
            )
            .map_err(|e| Error::OperationFailed {
                operation: "meta_exists".to_string(),
                cause: e.to_string(),
            })?;

        Ok(count > 0)
    }

    fn fetch(&self, owner: OwnerId, name: &str) -> Result<Option<MetaRow>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, user_id, name, value, timestamp, updated_at
                 FROM {} WHERE user_id = ?1 AND name = ?2",
                self.table
            ))
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_fetch_meta".to_string(),
                cause: e.to_string(),
            })?;

        let result = stmt
            .query_row(params![owner.get(), name], Self::row_to_meta)
            .optional()
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_meta".to_string(),
                cause: e.to_string(),
            })?;

        Ok(result)
    }

    fn fetch_all(&self, owner: OwnerId) -> Result<Vec<MetaRow>> {
        let conn = self.lock_conn()?;

        // No ORDER BY: callers get storage-returned order.
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, user_id, name, value, timestamp, updated_at
                 FROM {} WHERE user_id = ?1",
                self.table
            ))
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_fetch_all_meta".to_string(),
                cause: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![owner.get()], Self::row_to_meta)
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_all_meta".to_string(),
                cause: e.to_string(),
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::OperationFailed {
                operation: "collect_meta_rows".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows)
    }

    fn insert(&self, owner: OwnerId, name: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            &format!(
                "INSERT INTO {} (user_id, name, value) VALUES (?1, ?2, ?3)",
                self.table
            ),
            params![owner.get(), name, value],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "insert_meta".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    fn update_value(&self, owner: OwnerId, name: &str, value: &str) -> Result<u64> {
        let conn = self.lock_conn()?;

        let rows = conn
            .execute(
                &format!(
                    "UPDATE {} SET value = ?1, updated_at = datetime('now')
                     WHERE user_id = ?2 AND name = ?3",
                    self.table
                ),
                params![value, owner.get(), name],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "update_meta".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows as u64)
    }

    fn delete(&self, owner: OwnerId, name: &str) -> Result<u64> {
        let conn = self.lock_conn()?;

        let rows = conn
            .execute(
                &format!("DELETE FROM {} WHERE user_id = ?1 AND name = ?2", self.table),
                params![owner.get(), name],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "delete_meta".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows as u64)
    }
}
