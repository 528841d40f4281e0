//! Storage trait definitions.
//!
//! Defines the interface the accessor uses to reach the meta table.
//! Implementations receive already-validated identifiers: the accessor
//! rejects malformed owners and empty names before any of these methods
//! run, so backends only concern themselves with statement execution.

use crate::Result;
use crate::models::{MetaRow, OwnerId};

/// Trait for meta entry storage backends.
///
/// Rows are keyed by `(owner_id, name)` without a uniqueness constraint;
/// duplicate pairs are legal and several methods operate on all matching
/// rows at once. Implementations must be thread-safe (`Send + Sync`).
pub trait MetaBackend: Send + Sync {
    /// Checks whether at least one row matches `(owner, name)`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn exists(&self, owner: OwnerId, name: &str) -> Result<bool>;

    /// Fetches the first row matching `(owner, name)`.
    ///
    /// Which row is "first" is undefined when duplicates exist; the query
    /// carries no ORDER BY and takes whatever the storage engine yields.
    ///
    /// # Returns
    ///
    /// The raw row if found, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn fetch(&self, owner: OwnerId, name: &str) -> Result<Option<MetaRow>>;

    /// Fetches every row belonging to the owner, in storage-returned order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn fetch_all(&self, owner: OwnerId) -> Result<Vec<MetaRow>>;

    /// Inserts a new row for `(owner, name)`.
    ///
    /// Always inserts, even when rows with the same pair already exist;
    /// duplicate prevention is the caller's decision via the accessor's
    /// `update_if_exists` flag. The creation timestamp is server-assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn insert(&self, owner: OwnerId, name: &str, value: &str) -> Result<()>;

    /// Updates the value of every row matching `(owner, name)`.
    ///
    /// Refreshes `updated_at` on each touched row; the creation timestamp
    /// is left alone. There is no row-count limit: under duplicates, all
    /// matching rows change together.
    ///
    /// # Returns
    ///
    /// The number of rows updated (zero when no pair matches).
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn update_value(&self, owner: OwnerId, name: &str, value: &str) -> Result<u64>;

    /// Deletes every row matching `(owner, name)`.
    ///
    /// # Returns
    ///
    /// The number of rows deleted (zero is not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn delete(&self, owner: OwnerId, name: &str) -> Result<u64>;
}
