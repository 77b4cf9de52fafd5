use std::fs;

use dotenv_diff::config::CONFIG_FILE_NAME;
use dotenv_diff::{
    Config,
    LintError,
};
use tempfile::TempDir;

#[test]
fn test_discover_without_file() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(Config::discover(temp_dir.path()).unwrap(), None);
}

#[test]
fn test_discover_reads_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"{"ignore": ["NODE_ENV"], "minSeverity": "high", "healthWeights": {"unused": 0}}"#,
    )
    .unwrap();

    let config = Config::discover(temp_dir.path()).unwrap().unwrap();
    assert_eq!(config.ignore, vec!["NODE_ENV"]);
    assert_eq!(config.min_severity.as_deref(), Some("high"));
    assert_eq!(config.health_weights.unwrap().unused, 0);
}

#[test]
fn test_load_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(&temp_dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LintError::ConfigReadFailed { .. }));
}

#[test]
fn test_load_invalid_json_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ not json").unwrap();
    let err = Config::load(&path).unwrap_err();
    match err {
        LintError::ConfigParseFailed { path: p, .. } => assert!(p.ends_with(CONFIG_FILE_NAME)),
        other => panic!("unexpected error: {other}"),
    }
}
