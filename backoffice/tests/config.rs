use std::fs;

use backoffice::{ShellConfig, ShellError};
use log::LevelFilter;
use tabula::options::MatchMode;
use tempfile::TempDir;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_defaults() {
    let config = ShellConfig::default();
    assert_eq!(config.level(), LevelFilter::Debug);
    assert_eq!(config.products.page_size, 5);
    assert_eq!(config.status_filter.placeholder, "Any status");
    assert!(!config.status_filter.searchable);
    assert!(config.palette.grouped);
    assert!(!config.actions.retain_selection);
    assert_eq!((config.screen.width, config.screen.height), (100, 30));
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(ShellConfig::from_json("{}").unwrap(), ShellConfig::default());
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_partial_document() {
    let config = ShellConfig::from_json(
        r#"{
            "log_level": "warn",
            "platform": "MacIntel",
            "screen": { "width": 80 },
            "products": { "page_size": 20, "initial": { "view_type": "grid" } },
            "palette": { "match_mode": "fuzzy" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.level(), LevelFilter::Warn);
    assert_eq!(config.platform.as_deref(), Some("MacIntel"));
    assert_eq!((config.screen.width, config.screen.height), (80, 30));
    assert_eq!(config.products.page_size, 20);
    assert_eq!(
        config.products.initial.view_type,
        tabula::dataview::ViewType::Grid
    );
    assert_eq!(config.palette.match_mode, MatchMode::Fuzzy);
    assert_eq!(config.status_filter, ShellConfig::default().status_filter);
}

#[test]
fn test_unknown_level_falls_back_to_debug() {
    let config = ShellConfig::from_json(r#"{"log_level": "loud"}"#).unwrap();
    assert_eq!(config.level(), LevelFilter::Debug);
}

#[test]
fn test_invalid_json_is_reported() {
    let err = ShellConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ShellError::Json { .. }));
    assert!(err.to_string().contains("shell config"));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_missing_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let config = ShellConfig::load_or_default(&dir.join("config.json")).unwrap();
    assert_eq!(config, ShellConfig::default());
    assert!(matches!(
        ShellConfig::load(&dir.join("config.json")),
        Err(ShellError::Io(_))
    ));
}

#[test]
fn test_load_from_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let path = dir.join("config.json");
    fs::write(&path, r#"{"products": {"page_size": 3}}"#).unwrap();
    let config = ShellConfig::load_or_default(&path).unwrap();
    assert_eq!(config.products.page_size, 3);

    fs::write(&path, "[").unwrap();
    let err = ShellConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("config.json"));
}
