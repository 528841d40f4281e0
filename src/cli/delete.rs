//! Delete CLI command for removing meta entries.
//!
//! Deletion is physical and immediate, and removes every row matching the
//! pair. Deleting a pair with no rows is not an error.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::services::MetaService;
use crate::{Error, Result};

/// Executes the delete command.
///
/// # Errors
///
/// Returns an error if the owner or name fails validation, or if storage
/// access fails.
pub fn execute(service: &MetaService, owner: &str, name: &str) -> Result<()> {
    let deleted = service.delete(owner, name)?;
    if !deleted {
        return Err(Error::InvalidInput(
            "owner must be a positive integer and name must be non-empty".to_string(),
        ));
    }

    println!("Deleted '{name}' for owner {owner}");
    Ok(())
}
