//! Tests for configuration loading and graceful degradation
//!
//! Tests that manipulate HEDDWCH_ROOT_FOLDER are marked with #[serial]
//! so they don't race on the process environment.

use heddwch_common::config::{
    database_path, find_config_file, resolve_root_folder, DataSourceConfig, FinalAnswerPolicy,
    TomlConfig,
};
use heddwch_common::state::PageId;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

const ENV_VAR: &str = "HEDDWCH_ROOT_FOLDER";

#[test]
fn test_defaults_when_keys_are_absent() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert_eq!(config.port, 5790);
    assert_eq!(config.bus_capacity, 256);
    assert_eq!(config.history_max_entries, 100);
    assert_eq!(config.final_answer, FinalAnswerPolicy::Include);
    assert_eq!(config.initial_page, PageId::FactOrFiction);
    assert_eq!(config.logging.level, "info");
    assert!(matches!(config.data_source, DataSourceConfig::Url(_)));
}

#[test]
fn test_full_config_parses() {
    let config = TomlConfig::from_toml_str(
        r#"
        port = 6000
        root_folder = "/srv/heddwch"
        bus_capacity = 32
        final_answer = "exclude"
        debug_log_max_entries = 500
        history_max_entries = 20
        initial_page = "Headlines"

        [data_source]
        directory = "/srv/heddwch/www"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.port, 6000);
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/heddwch")));
    assert_eq!(config.final_answer, FinalAnswerPolicy::Exclude);
    assert_eq!(config.debug_log_max_entries, 500);
    assert_eq!(config.history_max_entries, 20);
    assert_eq!(config.initial_page, PageId::Headlines);
    assert_eq!(
        config.data_source,
        DataSourceConfig::Directory(PathBuf::from("/srv/heddwch/www"))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_internal_initial_page_is_rejected() {
    assert!(TomlConfig::from_toml_str(r#"initial_page = "internal""#).is_err());
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let config = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.port, 5790);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = TomlConfig::load_or_default(Some(Path::new("/definitely/not/here.toml")));
    assert_eq!(config.bus_capacity, 256);
}

#[test]
fn test_explicit_config_path_wins() {
    let explicit = Path::new("/tmp/custom.toml");
    assert_eq!(find_config_file(Some(explicit)), Some(explicit.to_path_buf()));
}

#[test]
#[serial]
fn test_cli_beats_environment() {
    env::set_var(ENV_VAR, "/from/env");
    let resolved = resolve_root_folder(
        Some(Path::new("/from/cli")),
        ENV_VAR,
        &TomlConfig::default(),
    );
    env::remove_var(ENV_VAR);

    assert_eq!(resolved, PathBuf::from("/from/cli"));
}

#[test]
#[serial]
fn test_environment_beats_toml() {
    env::set_var(ENV_VAR, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };
    let resolved = resolve_root_folder(None, ENV_VAR, &config);
    env::remove_var(ENV_VAR);

    assert_eq!(resolved, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn test_toml_beats_compiled_default() {
    env::remove_var(ENV_VAR);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };

    assert_eq!(
        resolve_root_folder(None, ENV_VAR, &config),
        PathBuf::from("/from/toml")
    );
}

#[test]
fn test_database_path_defaults_under_root() {
    let root = Path::new("/srv/heddwch");
    assert_eq!(
        database_path(root, &TomlConfig::default()),
        PathBuf::from("/srv/heddwch/heddwch.db")
    );

    let config = TomlConfig {
        database_path: Some(PathBuf::from("/var/db/quiz.db")),
        ..TomlConfig::default()
    };
    assert_eq!(database_path(root, &config), PathBuf::from("/var/db/quiz.db"));
}
