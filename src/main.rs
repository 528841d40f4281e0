//! Binary entry point for metastore.
//!
//! This binary provides the CLI interface for the per-owner meta entry
//! store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use metastore::cli::{self, OutputFormat};
use metastore::config::MetastoreConfig;
use metastore::observability;
use metastore::services::MetaService;

/// Metastore - a per-owner key-value attribute store.
#[derive(Parser)]
#[command(name = "metastore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides configuration).
    #[arg(long, global = true, env = "METASTORE_DB_PATH")]
    db: Option<PathBuf>,

    /// Table name prefix (overrides configuration).
    #[arg(long, global = true, env = "METASTORE_TABLE_PREFIX")]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Save a meta entry.
    Set {
        /// Numeric owner id.
        owner: String,

        /// Attribute name.
        name: String,

        /// Attribute value.
        value: String,

        /// Update an existing entry instead of inserting a duplicate.
        #[arg(short, long)]
        update: bool,
    },

    /// Show the first entry matching an owner and name.
    Get {
        /// Numeric owner id.
        owner: String,

        /// Attribute name.
        name: String,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show every entry belonging to an owner.
    List {
        /// Numeric owner id.
        owner: String,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Remove every entry matching an owner and name.
    Delete {
        /// Numeric owner id.
        owner: String,

        /// Attribute name.
        name: String,
    },

    /// Check whether an entry exists.
    Exists {
        /// Numeric owner id.
        owner: String,

        /// Attribute name.
        name: String,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // Load .env files before reading any configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match MetastoreConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(prefix) = cli.prefix {
        config.table_prefix = prefix;
    }

    if let Err(e) = observability::init(config.log_format, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let service = match MetaService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to open meta store: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = match cli.command {
        Commands::Set {
            owner,
            name,
            value,
            update,
        } => cli::cmd_set(&service, &owner, &name, &value, update),
        Commands::Get {
            owner,
            name,
            format,
        } => cli::cmd_get(&service, &owner, &name, OutputFormat::parse(&format)),
        Commands::List { owner, format } => {
            cli::cmd_list(&service, &owner, OutputFormat::parse(&format))
        },
        Commands::Delete { owner, name } => cli::cmd_delete(&service, &owner, &name),
        Commands::Exists { owner, name } => cli::cmd_exists(&service, &owner, &name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
