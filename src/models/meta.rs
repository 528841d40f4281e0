//! Meta entry models.
//!
//! A meta entry is a single named key-value attribute attached to an owner
//! (for example, a user's `theme` preference). Entries are keyed by
//! `(owner_id, name)`; the pair is NOT unique: plain inserts may create
//! duplicates, which the update path then treats as a multi-valued
//! attribute and touches together.
//!
//! Two representations exist:
//! - [`MetaRow`]: the raw storage row, values verbatim as stored
//! - [`MetaEntry`]: the sanitized output record, every string field
//!   HTML-escaped and `timestamp` renamed to `created_date`
//!
//! # Example
//!
//! ```rust
//! use metastore::models::OwnerId;
//!
//! assert!(OwnerId::parse("42").is_some());
//! assert!(OwnerId::parse("abc").is_none());
//! assert!(OwnerId::parse("0").is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sanitize::html_output;

/// Validated numeric identifier of the entity owning a meta entry.
///
/// Only positive integers are valid owners. [`OwnerId::parse`] is the
/// single chokepoint through which untrusted request input becomes a typed
/// identifier; every accessor operation funnels its owner argument through
/// it before any storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

impl OwnerId {
    /// Parses an owner id from untrusted string input.
    ///
    /// Returns `None` for empty input, non-numeric input, zero, and
    /// negative values. No trimming is applied: `" 42"` is rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metastore::models::OwnerId;
    ///
    /// assert_eq!(OwnerId::parse("7").map(OwnerId::get), Some(7));
    /// assert_eq!(OwnerId::parse(""), None);
    /// assert_eq!(OwnerId::parse("-7"), None);
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        match input.parse::<i64>() {
            Ok(id) if id > 0 => Some(Self(id)),
            _ => None,
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for OwnerId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(format!("owner id must be positive, got {value}"))
        }
    }
}

/// Returns `true` if the given meta name is acceptable.
///
/// The only requirement is non-emptiness; names are otherwise free-form
/// strings and are always bound as statement parameters, never interpolated.
#[must_use]
pub const fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
}

/// Raw storage row for a meta entry.
///
/// Field values are exactly as stored: no escaping, no renaming. This type
/// never crosses the accessor boundary; reads hand callers a sanitized
/// [`MetaEntry`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRow {
    /// Surrogate row id.
    pub id: i64,

    /// Owner the entry belongs to.
    pub owner_id: i64,

    /// Attribute name.
    pub name: String,

    /// Attribute value, stored verbatim.
    pub value: String,

    /// Server-assigned creation timestamp. Immutable after insert.
    pub timestamp: String,

    /// Server-assigned update timestamp. `None` until the entry is first
    /// updated through the update path.
    pub updated_at: Option<String>,
}

/// Sanitized output record for a meta entry.
///
/// Safe for direct embedding in rendered markup: every field, including the
/// identifier, has passed through [`html_output`]. The storage column
/// `timestamp` surfaces as `created_date` here.
///
/// Escaping is purely a read-time transform; the stored copy is never
/// modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Surrogate row id, rendered and escaped.
    pub id: String,

    /// Attribute name, escaped.
    pub name: String,

    /// Attribute value, escaped.
    pub value: String,

    /// Creation timestamp, escaped.
    pub created_date: String,

    /// Update timestamp, escaped; `None` if the row was never updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl MetaEntry {
    /// Builds a sanitized record from a raw storage row.
    ///
    /// This is the row codec: field renaming plus HTML-escaping of every
    /// string value.
    #[must_use]
    pub fn from_row(row: &MetaRow) -> Self {
        Self {
            id: html_output(&row.id.to_string()),
            name: html_output(&row.name),
            value: html_output(&row.value),
            created_date: html_output(&row.timestamp),
            updated_at: row.updated_at.as_deref().map(html_output),
        }
    }
}
