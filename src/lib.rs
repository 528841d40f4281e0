//! # Metastore
//!
//! A per-owner key-value attribute store backed by `SQLite`.
//!
//! Metastore manages named string attributes ("meta entries") attached to a
//! numeric owner, such as per-user settings in an admin panel. Entries are
//! keyed by `(owner_id, name)`, carry server-assigned creation and update
//! timestamps, and are HTML-escaped on every read so they can be embedded
//! directly in rendered markup.
//!
//! ## Features
//!
//! - Five-operation accessor: exists, get, get-all, save (flag-gated
//!   upsert), delete
//! - Boundary validation: malformed identifiers never reach storage
//! - Pluggable storage behind the [`MetaBackend`] trait, with a bundled
//!   `SQLite` implementation
//! - Read-time sanitization: stored values stay verbatim, returned values
//!   are escaped
//!
//! ## Example
//!
//! ```rust,ignore
//! use metastore::MetaService;
//!
//! let service = MetaService::in_memory()?;
//! service.save("42", "theme", "dark", false)?;
//! let entry = service.get("42", "theme")?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod sanitize;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::MetastoreConfig;
pub use models::{MetaEntry, MetaRow, OwnerId};
pub use services::MetaService;
pub use storage::{MetaBackend, SqliteMetaBackend, TableResolver};

/// Error type for metastore operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait
/// implementations.
///
/// Boundary validation failures (empty or non-numeric owner, empty name)
/// are NOT errors: the accessor encodes them in its return value
/// (`false`/`None`) without touching storage. These variants cover the
/// cases that must surface to the caller.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A table prefix contains non-identifier characters
    /// - A configuration file cannot be parsed
    /// - A CLI argument fails validation outside the accessor boundary
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` statement preparation or execution fails
    /// - The database cannot be opened or its schema initialized
    /// - The connection mutex is poisoned
    ///
    /// Storage-layer faults always surface through this variant; they are
    /// never folded into the accessor's boolean results.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for metastore operations.
pub type Result<T> = std::result::Result<T, Error>;
