//! Exists CLI command for probing a meta entry.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::services::MetaService;
use crate::Result;

/// Executes the exists command.
///
/// Prints `true` or `false`. A malformed owner prints `false`, matching
/// the accessor's contract of encoding usage errors in the result.
///
/// # Errors
///
/// Returns an error if storage access fails.
pub fn execute(service: &MetaService, owner: &str, name: &str) -> Result<()> {
    let exists = service.exists(owner, name)?;
    println!("{exists}");
    Ok(())
}
