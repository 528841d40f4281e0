//! Configuration management.
//!
//! Configuration is resolved in three layers, later layers winning:
//! built-in defaults, an optional TOML file, then `METASTORE_*`
//! environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::observability::LogFormat;
use crate::{Error, Result};

/// Main configuration for metastore.
#[derive(Debug, Clone)]
pub struct MetastoreConfig {
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Prefix applied to physical table names. Empty for none.
    pub table_prefix: String,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Database file path.
    pub db_path: Option<String>,
    /// Table name prefix.
    pub table_prefix: Option<String>,
    /// Log format: "pretty" or "json".
    pub log_format: Option<String>,
}

impl Default for MetastoreConfig {
    fn default() -> Self {
        Self {
            db_path: Self::default_db_path()
                .unwrap_or_else(|| PathBuf::from(".metastore").join("meta.db")),
            table_prefix: String::new(),
            log_format: LogFormat::default(),
        }
    }
}

impl MetastoreConfig {
    /// Returns the default database path.
    ///
    /// The path is `~/.config/metastore/meta.db`.
    #[must_use]
    pub fn default_db_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| {
            d.home_dir()
                .join(".config")
                .join("metastore")
                .join("meta.db")
        })
    }

    /// Returns the default configuration file path.
    ///
    /// The path is `~/.config/metastore/config.toml`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| {
            d.home_dir()
                .join(".config")
                .join("metastore")
                .join("config.toml")
        })
    }

    /// Loads configuration.
    ///
    /// An explicitly given file must exist and parse; the default config
    /// file is used only when present. Environment variables are applied
    /// last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file cannot be read or if
    /// any config file fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;
            config.apply_file(&Self::parse(&raw)?);
        } else if let Some(default_path) = Self::default_config_path()
            && default_path.exists()
        {
            let raw =
                std::fs::read_to_string(&default_path).map_err(|e| Error::OperationFailed {
                    operation: "read_config_file".to_string(),
                    cause: format!("{}: {e}", default_path.display()),
                })?;
            config.apply_file(&Self::parse(&raw)?);
        }

        config.apply_env();
        Ok(config)
    }

    /// Parses a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on malformed TOML.
    pub fn parse(raw: &str) -> Result<ConfigFile> {
        toml::from_str(raw).map_err(|e| Error::InvalidInput(format!("invalid config file: {e}")))
    }

    /// Applies values from a parsed config file.
    pub fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(db_path) = &file.db_path {
            self.db_path = PathBuf::from(db_path);
        }
        if let Some(prefix) = &file.table_prefix {
            self.table_prefix.clone_from(prefix);
        }
        if let Some(format) = &file.log_format {
            self.log_format = LogFormat::parse(format);
        }
    }

    /// Applies `METASTORE_*` environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(db_path) = std::env::var("METASTORE_DB_PATH") {
            self.db_path = PathBuf::from(db_path);
        }
        if let Ok(prefix) = std::env::var("METASTORE_TABLE_PREFIX") {
            self.table_prefix = prefix;
        }
        if let Ok(format) = std::env::var("METASTORE_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetastoreConfig::default();
        assert!(config.table_prefix.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.db_path.ends_with("meta.db"));
    }

    #[test]
    fn test_parse_and_apply_file() {
        let file = MetastoreConfig::parse(
            r#"
            db_path = "/tmp/meta-test.db"
            table_prefix = "ms_"
            log_format = "json"
            "#,
        )
        .expect("parse failed");

        let mut config = MetastoreConfig::default();
        config.apply_file(&file);

        assert_eq!(config.db_path, PathBuf::from("/tmp/meta-test.db"));
        assert_eq!(config.table_prefix, "ms_");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = MetastoreConfig::parse(r#"table_prefix = "app_""#).expect("parse failed");

        let mut config = MetastoreConfig::default();
        config.apply_file(&file);

        assert_eq!(config.table_prefix, "app_");
        assert!(config.db_path.ends_with("meta.db"));
    }

    #[test]
    fn test_malformed_toml_is_invalid_input() {
        let err = MetastoreConfig::parse("db_path = [broken").unwrap_err();
        assert!(err.to_string().contains("invalid input"));
    }
}
