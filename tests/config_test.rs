//! Unit tests for config.rs module

use std::fs;
use std::path::PathBuf;

use contact_book::config::{AppConfig, ExportConfig, LoggingConfig, StorageConfig};
use contact_book::BackendKind;
use tempfile::tempdir;

#[test]
fn test_default_storage_config() {
    let config = AppConfig::default();

    assert_eq!(
        config.storage,
        StorageConfig {
            backend: BackendKind::Relational,
            sqlite_path: PathBuf::from("contacts.db"),
            document_path: PathBuf::from("contacts.sled"),
            max_connections: 4,
        }
    );
}

#[test]
fn test_default_export_config() {
    let config = AppConfig::default();

    assert_eq!(
        config.export,
        ExportConfig {
            json_path: PathBuf::from("contacts.json"),
        }
    );
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    );
}

#[test]
fn test_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_export_path_rejected() {
    let mut config = AppConfig::default();
    config.export.json_path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_connections_rejected() {
    let mut config = AppConfig::default();
    config.storage.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_yaml_file_overrides_defaults() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("settings.yaml");
    fs::write(
        &path,
        "storage:\n  backend: dual-write\n  document_path: data/contacts.sled\nexport:\n  json_path: out/contacts.json\n",
    )
    .expect("Failed to write config file");

    let config = AppConfig::load_from(Some(&path)).expect("Failed to load configuration");

    assert_eq!(config.storage.backend, BackendKind::DualWrite);
    assert_eq!(config.storage.document_path, PathBuf::from("data/contacts.sled"));
    assert_eq!(config.storage.sqlite_path, PathBuf::from("contacts.db"));
    assert_eq!(config.export.json_path, PathBuf::from("out/contacts.json"));
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    assert!(AppConfig::load_from(Some(&temp_dir.path().join("absent.yaml"))).is_err());
}

#[test]
fn test_yaml_dump_round_trips() {
    let config = AppConfig::default();
    let yaml = config.to_yaml().expect("Failed to render YAML");
    assert!(yaml.contains("backend: relational"));

    let parsed: AppConfig = serde_yaml::from_str(&yaml).expect("Failed to parse YAML");
    assert_eq!(parsed, config);
}
