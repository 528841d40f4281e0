//! Integration tests for metastore.
#![allow(clippy::panic, clippy::too_many_lines, clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;

use metastore::config::MetastoreConfig;
use metastore::observability::LogFormat;
use metastore::storage::{SqliteMetaBackend, TableResolver};
use metastore::{Error, MetaService};

fn temp_db_path(file: &str) -> PathBuf {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(file);
    // Leak the TempDir to keep it alive for the duration of the test
    std::mem::forget(dir);
    path
}

fn file_backed_service(file: &str) -> (MetaService, PathBuf) {
    let path = temp_db_path(file);
    let backend = SqliteMetaBackend::new(&path, &TableResolver::default())
        .expect("Failed to create backend");
    (MetaService::new(Arc::new(backend)), path)
}

#[test]
fn test_error_types() {
    // Test InvalidInput error
    let err = Error::InvalidInput("test message".to_string());
    let display = format!("{err}");
    assert!(display.contains("invalid input"));
    assert!(display.contains("test message"));

    // Test OperationFailed error
    let err = Error::OperationFailed {
        operation: "fetch_meta".to_string(),
        cause: "disk I/O error".to_string(),
    };
    let display = format!("{err}");
    assert!(display.contains("fetch_meta"));
    assert!(display.contains("disk I/O error"));
}

#[test]
fn test_save_get_update_round_trip() {
    let (service, _path) = file_backed_service("round_trip.db");

    assert!(service.save("42", "theme", "dark", false).expect("save failed"));

    let entry = service
        .get("42", "theme")
        .expect("get failed")
        .expect("entry missing");
    assert_eq!(entry.name, "theme");
    assert_eq!(entry.value, "dark");
    assert_eq!(entry.updated_at, None);
    let created = entry.created_date.clone();

    assert!(service.save("42", "theme", "light", true).expect("save failed"));

    let updated = service
        .get("42", "theme")
        .expect("get failed")
        .expect("entry missing");
    assert_eq!(updated.value, "light");
    assert_eq!(updated.created_date, created);
    assert!(updated.updated_at.is_some());

    // Update-in-place did not grow the row count
    let all = service
        .get_all("42")
        .expect("get_all failed")
        .expect("no entries");
    assert_eq!(all.len(), 1);
}

#[test]
fn test_plain_saves_accumulate_duplicates() {
    let (service, _path) = file_backed_service("duplicates.db");

    assert!(service.save("7", "tag", "alpha", false).expect("save failed"));
    assert!(service.save("7", "tag", "beta", false).expect("save failed"));

    let entries = service
        .get_all("7")
        .expect("get_all failed")
        .expect("no entries");
    assert_eq!(entries.len(), 2);

    let values: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();
    assert!(values.contains(&"alpha"));
    assert!(values.contains(&"beta"));

    // The flag-gated update touches every duplicate at once
    assert!(service.save("7", "tag", "gamma", true).expect("save failed"));
    let entries = service
        .get_all("7")
        .expect("get_all failed")
        .expect("no entries");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.value == "gamma"));
}

#[test]
fn test_delete_then_exists() {
    let (service, _path) = file_backed_service("delete.db");

    service.save("9", "locale", "en", false).expect("save failed");
    assert!(service.exists("9", "locale").expect("exists failed"));

    assert!(service.delete("9", "locale").expect("delete failed"));
    assert!(!service.exists("9", "locale").expect("exists failed"));

    // Deleting an absent pair still reports statement success
    assert!(service.delete("9", "locale").expect("delete failed"));
}

#[test]
fn test_stored_markup_never_returns_raw() {
    let (service, _path) = file_backed_service("escaping.db");

    service
        .save("3", "signature", "<script>alert(\"x\")</script>", false)
        .expect("save failed");

    let entry = service
        .get("3", "signature")
        .expect("get failed")
        .expect("entry missing");
    assert_eq!(
        entry.value,
        "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
    );

    let all = service
        .get_all("3")
        .expect("get_all failed")
        .expect("no entries");
    assert!(!all[0].value.contains('<'));
    assert!(!all[0].value.contains('"'));
}

#[test]
fn test_invalid_identifiers_short_circuit() {
    let (service, _path) = file_backed_service("validation.db");

    for owner in ["", "abc", "0", "-1", "1.5"] {
        assert!(!service.exists(owner, "theme").expect("exists failed"));
        assert!(service.get(owner, "theme").expect("get failed").is_none());
        assert!(service.get_all(owner).expect("get_all failed").is_none());
        assert!(!service.save(owner, "theme", "v", false).expect("save failed"));
        assert!(!service.delete(owner, "theme").expect("delete failed"));
    }

    assert!(!service.exists("42", "").expect("exists failed"));
    assert!(!service.save("42", "", "v", false).expect("save failed"));
}

#[test]
fn test_entries_survive_reopen() {
    let path = temp_db_path("reopen.db");

    {
        let backend = SqliteMetaBackend::new(&path, &TableResolver::default())
            .expect("Failed to create backend");
        let service = MetaService::new(Arc::new(backend));
        service.save("5", "color", "blue", false).expect("save failed");
    }

    let backend = SqliteMetaBackend::new(&path, &TableResolver::default())
        .expect("Failed to reopen backend");
    let service = MetaService::new(Arc::new(backend));

    let entry = service
        .get("5", "color")
        .expect("get failed")
        .expect("entry missing");
    assert_eq!(entry.value, "blue");
}

#[test]
fn test_service_from_config_with_prefix() {
    let config = MetastoreConfig {
        db_path: temp_db_path("prefixed.db"),
        table_prefix: "ps_".to_string(),
        log_format: LogFormat::Pretty,
    };

    let service = MetaService::from_config(&config).expect("Failed to build service");
    service.save("11", "theme", "dark", false).expect("save failed");
    assert!(service.exists("11", "theme").expect("exists failed"));
}

#[test]
fn test_from_config_rejects_bad_prefix() {
    let config = MetastoreConfig {
        db_path: temp_db_path("bad_prefix.db"),
        table_prefix: "bad-prefix;".to_string(),
        log_format: LogFormat::Pretty,
    };

    let err = MetaService::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
