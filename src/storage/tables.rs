//! Logical-to-physical table name resolution.
//!
//! Deployments may share a database with other applications and prefix
//! every table (`ms_user_meta` instead of `user_meta`). The resolver owns
//! that mapping. Resolved names are the only text interpolated into SQL
//! (all values are bound), so the prefix is validated to identifier
//! characters at construction and trusted afterwards.

use crate::{Error, Result};

/// Maps logical table names to physical, possibly-prefixed names.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    prefix: String,
}

impl TableResolver {
    /// Creates a resolver with the given table prefix.
    ///
    /// An empty prefix is valid and leaves logical names unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the prefix contains characters
    /// outside `[A-Za-z0-9_]` or starts with a digit.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();

        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidInput(format!(
                "table prefix '{prefix}' contains non-identifier characters"
            )));
        }
        if prefix.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "table prefix '{prefix}' must not start with a digit"
            )));
        }

        Ok(Self { prefix })
    }

    /// Returns the physical name for a logical table.
    #[must_use]
    pub fn resolve(&self, logical: &str) -> String {
        format!("{}{logical}", self.prefix)
    }

    /// Returns the configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
