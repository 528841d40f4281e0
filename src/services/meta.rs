//! Meta entry accessor service.
//!
//! Provides the five operations over the per-owner attribute table:
//! exists, get, get-all, save (flag-gated upsert), and delete.
//!
//! The service is the trust boundary. Owner and name arrive as untrusted
//! strings, the way a request handler receives them; malformed identifiers
//! short-circuit with `false`/`None` before any storage call. Past the
//! boundary, injection safety rests on bound statement parameters, and
//! every value read back is HTML-escaped by the row codec.
//!
//! # Example
//!
//! ```rust,ignore
//! use metastore::MetaService;
//!
//! let service = MetaService::in_memory()?;
//! service.save("42", "theme", "dark", false)?;
//! assert!(service.exists("42", "theme")?);
//!
//! let entry = service.get("42", "theme")?.unwrap();
//! assert_eq!(entry.value, "dark");
//! ```

use std::sync::Arc;

use crate::config::MetastoreConfig;
use crate::models::{MetaEntry, OwnerId, is_valid_name};
use crate::storage::{MetaBackend, SqliteMetaBackend, TableResolver};
use crate::Result;

/// Accessor service for per-owner meta entries.
///
/// Encapsulates boundary validation, upsert flag handling, and read-time
/// sanitization. Uses a [`MetaBackend`] for persistence.
pub struct MetaService {
    backend: Arc<dyn MetaBackend>,
}

impl std::fmt::Debug for MetaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaService").finish_non_exhaustive()
    }
}

impl MetaService {
    /// Creates a new service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn MetaBackend>) -> Self {
        Self { backend }
    }

    /// Creates a service over an in-memory `SQLite` backend (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Arc::new(SqliteMetaBackend::in_memory()?)))
    }

    /// Creates a service from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the table prefix is invalid or the database
    /// cannot be opened.
    pub fn from_config(config: &MetastoreConfig) -> Result<Self> {
        let resolver = TableResolver::new(config.table_prefix.clone())?;
        let backend = SqliteMetaBackend::new(&config.db_path, &resolver)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Creates a service with default configuration.
    ///
    /// Uses the default database path under the user's config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn try_default() -> Result<Self> {
        Self::from_config(&MetastoreConfig::default())
    }

    /// Validates the owner/name pair at the accessor boundary.
    ///
    /// `None` means the caller gets a negative result without any storage
    /// round trip.
    fn validate_pair(owner: &str, name: &str) -> Option<OwnerId> {
        if !is_valid_name(name) {
            tracing::debug!(owner = %owner, "Rejected meta operation: empty name");
            return None;
        }
        let parsed = OwnerId::parse(owner);
        if parsed.is_none() {
            tracing::debug!(owner = %owner, name = %name, "Rejected meta operation: malformed owner id");
        }
        parsed
    }

    /// Checks whether a meta entry exists for `(owner, name)`.
    ///
    /// Returns `Ok(false)` without a query when either identifier fails
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn exists(&self, owner: &str, name: &str) -> Result<bool> {
        let Some(owner_id) = Self::validate_pair(owner, name) else {
            return Ok(false);
        };

        self.backend.exists(owner_id, name)
    }

    /// Gets the first meta entry matching `(owner, name)`, sanitized.
    ///
    /// Which entry is "first" is undefined when duplicate pairs exist.
    /// Returns `Ok(None)` on no match or validation failure.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn get(&self, owner: &str, name: &str) -> Result<Option<MetaEntry>> {
        let Some(owner_id) = Self::validate_pair(owner, name) else {
            return Ok(None);
        };

        let row = self.backend.fetch(owner_id, name)?;
        Ok(row.as_ref().map(MetaEntry::from_row))
    }

    /// Gets every meta entry for the owner, sanitized, in storage order.
    ///
    /// Returns `Ok(None)` both when the owner has no entries and when the
    /// owner id fails validation; the two cases are not distinguishable
    /// from the return value. Callers that need the distinction can
    /// pre-validate with [`OwnerId::parse`].
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn get_all(&self, owner: &str) -> Result<Option<Vec<MetaEntry>>> {
        let Some(owner_id) = OwnerId::parse(owner) else {
            tracing::debug!(owner = %owner, "Rejected meta list: malformed owner id");
            return Ok(None);
        };

        let rows = self.backend.fetch_all(owner_id)?;
        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(rows.iter().map(MetaEntry::from_row).collect()))
    }

    /// Saves a meta entry.
    ///
    /// With `update_if_exists` set and at least one row present for the
    /// pair, updates `value` and refreshes `updated_at` on every matching
    /// row. Otherwise inserts a new row, including when the pair already
    /// exists, which creates a duplicate.
    ///
    /// The existence check and the write are two separate statements;
    /// concurrent savers racing on the same pair can both take the insert
    /// branch and produce duplicates. Known limitation.
    ///
    /// Returns `Ok(false)` without a query when validation fails,
    /// `Ok(true)` when the executed statement succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn save(
        &self,
        owner: &str,
        name: &str,
        value: &str,
        update_if_exists: bool,
    ) -> Result<bool> {
        let Some(owner_id) = Self::validate_pair(owner, name) else {
            return Ok(false);
        };

        if update_if_exists && self.backend.exists(owner_id, name)? {
            let rows = self.backend.update_value(owner_id, name, value)?;
            tracing::info!(owner = %owner_id, name = %name, rows, "Meta entry updated");
            return Ok(true);
        }

        self.backend.insert(owner_id, name, value)?;
        tracing::info!(owner = %owner_id, name = %name, "Meta entry created");
        Ok(true)
    }

    /// Deletes every meta entry matching `(owner, name)`.
    ///
    /// Returns statement success, not an affected-row count: deleting zero
    /// rows still yields `Ok(true)`. Validation failure yields `Ok(false)`
    /// without a query.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn delete(&self, owner: &str, name: &str) -> Result<bool> {
        let Some(owner_id) = Self::validate_pair(owner, name) else {
            return Ok(false);
        };

        let rows = self.backend.delete(owner_id, name)?;
        tracing::info!(owner = %owner_id, name = %name, rows, "Meta entries deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetaRow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    /// Backend double that counts every storage call.
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetaBackend for CountingBackend {
        fn exists(&self, _owner: OwnerId, _name: &str) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        }

        fn fetch(&self, _owner: OwnerId, _name: &str) -> Result<Option<MetaRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        fn fetch_all(&self, _owner: OwnerId) -> Result<Vec<MetaRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn insert(&self, _owner: OwnerId, _name: &str, _value: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn update_value(&self, _owner: OwnerId, _name: &str, _value: &str) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        fn delete(&self, _owner: OwnerId, _name: &str) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    fn service() -> MetaService {
        MetaService::in_memory().expect("Failed to create in-memory service")
    }

    #[test_case(""; "empty owner")]
    #[test_case("abc"; "alphabetic owner")]
    #[test_case("0"; "zero owner")]
    #[test_case("-3"; "negative owner")]
    #[test_case("4.2"; "float owner")]
    fn test_invalid_owner_issues_no_storage_calls(owner: &str) {
        let backend = Arc::new(CountingBackend::default());
        let svc = MetaService::new(backend.clone());

        assert!(!svc.exists(owner, "theme").expect("exists failed"));
        assert!(svc.get(owner, "theme").expect("get failed").is_none());
        assert!(svc.get_all(owner).expect("get_all failed").is_none());
        assert!(!svc.save(owner, "theme", "dark", true).expect("save failed"));
        assert!(!svc.delete(owner, "theme").expect("delete failed"));

        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_empty_name_issues_no_storage_calls() {
        let backend = Arc::new(CountingBackend::default());
        let svc = MetaService::new(backend.clone());

        assert!(!svc.exists("42", "").expect("exists failed"));
        assert!(svc.get("42", "").expect("get failed").is_none());
        assert!(!svc.save("42", "", "v", false).expect("save failed"));
        assert!(!svc.delete("42", "").expect("delete failed"));

        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_exists_after_save() {
        let svc = service();

        assert!(!svc.exists("42", "theme").expect("exists failed"));
        assert!(svc.save("42", "theme", "dark", false).expect("save failed"));
        assert!(svc.exists("42", "theme").expect("exists failed"));
    }

    #[test]
    fn test_update_if_exists_replaces_value_without_growing_rows() {
        let svc = service();

        svc.save("42", "theme", "dark", false).expect("save failed");
        svc.save("42", "theme", "light", true).expect("save failed");

        let entries = svc
            .get_all("42")
            .expect("get_all failed")
            .expect("no entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "light");
        assert!(entries[0].updated_at.is_some());
    }

    #[test]
    fn test_update_if_exists_on_missing_pair_inserts() {
        let svc = service();

        assert!(svc.save("42", "theme", "dark", true).expect("save failed"));

        let entry = svc
            .get("42", "theme")
            .expect("get failed")
            .expect("entry missing");
        assert_eq!(entry.value, "dark");
        assert_eq!(entry.updated_at, None);
    }

    #[test]
    fn test_plain_save_creates_duplicates() {
        let svc = service();

        svc.save("42", "tag", "a", false).expect("save failed");
        svc.save("42", "tag", "b", false).expect("save failed");

        let entries = svc
            .get_all("42")
            .expect("get_all failed")
            .expect("no entries");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_delete_then_exists_is_false() {
        let svc = service();

        svc.save("42", "theme", "dark", false).expect("save failed");
        assert!(svc.delete("42", "theme").expect("delete failed"));
        assert!(!svc.exists("42", "theme").expect("exists failed"));
    }

    #[test]
    fn test_delete_missing_pair_still_succeeds() {
        let svc = service();

        assert!(svc.delete("42", "never-set").expect("delete failed"));
    }

    #[test]
    fn test_reads_escape_stored_markup() {
        let svc = service();

        svc.save("42", "bio", "<script>alert(1)</script>", false)
            .expect("save failed");

        let entry = svc
            .get("42", "bio")
            .expect("get failed")
            .expect("entry missing");
        assert!(!entry.value.contains('<'));
        assert_eq!(entry.value, "&lt;script&gt;alert(1)&lt;/script&gt;");

        let all = svc
            .get_all("42")
            .expect("get_all failed")
            .expect("no entries");
        assert_eq!(all[0].value, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn test_get_all_empty_and_invalid_conflate_to_none() {
        let svc = service();

        // No rows for a valid owner and an invalid owner look identical
        assert!(svc.get_all("42").expect("get_all failed").is_none());
        assert!(svc.get_all("abc").expect("get_all failed").is_none());
    }

    #[test]
    fn test_save_get_update_scenario() {
        let svc = service();

        assert!(svc.save("42", "theme", "dark", false).expect("save failed"));

        let first = svc
            .get("42", "theme")
            .expect("get failed")
            .expect("entry missing");
        assert_eq!(first.name, "theme");
        assert_eq!(first.value, "dark");

        assert!(svc.save("42", "theme", "light", true).expect("save failed"));

        let second = svc
            .get("42", "theme")
            .expect("get failed")
            .expect("entry missing");
        assert_eq!(second.value, "light");
        assert_eq!(second.created_date, first.created_date);
        assert_eq!(second.id, first.id);
    }
}
