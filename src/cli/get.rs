//! Get CLI command for reading a single meta entry.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::services::MetaService;
use crate::{Error, Result};

use super::OutputFormat;

/// Executes the get command.
///
/// Prints the first entry matching the pair; under duplicates, which one
/// is printed is undefined.
///
/// # Errors
///
/// Returns an error if storage access fails or JSON serialization fails.
pub fn execute(
    service: &MetaService,
    owner: &str,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let Some(entry) = service.get(owner, name)? else {
        println!("No meta entry found for owner {owner} and name '{name}'");
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&entry).map_err(|e| Error::OperationFailed {
                    operation: "serialize_meta_entry".to_string(),
                    cause: e.to_string(),
                })?;
            println!("{json}");
        },
        OutputFormat::Table => {
            println!("id:           {}", entry.id);
            println!("name:         {}", entry.name);
            println!("value:        {}", entry.value);
            println!("created_date: {}", entry.created_date);
            println!(
                "updated_at:   {}",
                entry.updated_at.as_deref().unwrap_or("-")
            );
        },
    }

    Ok(())
}
