//! List CLI command for reading every meta entry of an owner.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::services::MetaService;
use crate::{Error, Result};

use super::OutputFormat;

/// Executes the list command.
///
/// Entries print in storage-returned order. An owner with no entries and
/// an invalid owner produce the same "nothing found" output; the accessor
/// does not distinguish them.
///
/// # Errors
///
/// Returns an error if storage access fails or JSON serialization fails.
pub fn execute(service: &MetaService, owner: &str, format: OutputFormat) -> Result<()> {
    let Some(entries) = service.get_all(owner)? else {
        println!("No meta entries found for owner {owner}");
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&entries).map_err(|e| Error::OperationFailed {
                    operation: "serialize_meta_entries".to_string(),
                    cause: e.to_string(),
                })?;
            println!("{json}");
        },
        OutputFormat::Table => {
            let name_width = entries
                .iter()
                .map(|e| e.name.len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("{:<6} {:<name_width$} {:<20} VALUE", "ID", "NAME", "CREATED");
            for entry in &entries {
                println!(
                    "{:<6} {:<name_width$} {:<20} {}",
                    entry.id, entry.name, entry.created_date, entry.value
                );
            }
            println!("{} entries", entries.len());
        },
    }

    Ok(())
}
