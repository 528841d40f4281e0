//! Set CLI command for saving meta entries.
//!
//! # Usage
//!
//! ```bash
//! # Insert a new entry (duplicates a pair that already exists)
//! metastore set 42 theme dark
//!
//! # Update the existing entry in place instead
//! metastore set 42 theme light --update
//! ```

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::services::MetaService;
use crate::{Error, Result};

/// Executes the set command.
///
/// # Errors
///
/// Returns an error if the owner or name fails validation, or if storage
/// access fails.
pub fn execute(
    service: &MetaService,
    owner: &str,
    name: &str,
    value: &str,
    update: bool,
) -> Result<()> {
    let saved = service.save(owner, name, value, update)?;
    if !saved {
        return Err(Error::InvalidInput(
            "owner must be a positive integer and name must be non-empty".to_string(),
        ));
    }

    println!("Saved '{name}' for owner {owner}");
    Ok(())
}
