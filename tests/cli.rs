use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dotenv_diff(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dotenv-diff").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_compare_clean_exits_zero() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=1\nB=2\n").unwrap();
    fs::write(dir.path().join(".env.example"), "A=\nB=\n").unwrap();

    dotenv_diff(&dir)
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ All keys match"))
        .stdout(predicate::str::contains("Health score: 100/100"));
}

#[test]
fn test_compare_missing_key_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=1\n").unwrap();
    fs::write(dir.path().join(".env.example"), "A=\nB=\n").unwrap();

    dotenv_diff(&dir)
        .arg("compare")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing keys (1)"))
        .stdout(predicate::str::contains("- B"));
}

#[test]
fn test_compare_ignore_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=1\n").unwrap();
    fs::write(dir.path().join(".env.example"), "A=\nB=\n").unwrap();

    dotenv_diff(&dir)
        .args(["compare", "--ignore", "B"])
        .assert()
        .success();
}

#[test]
fn test_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=1\nEXTRA=1\n").unwrap();
    fs::write(dir.path().join(".env.example"), "A=\n").unwrap();

    dotenv_diff(&dir).arg("compare").assert().success();
    dotenv_diff(&dir)
        .args(["compare", "--strict"])
        .assert()
        .failure();
}

#[test]
fn test_compare_json_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=1\n").unwrap();
    fs::write(dir.path().join(".env.example"), "A=2\n").unwrap();

    let output = dotenv_diff(&dir)
        .args(["compare", "--json", "--check-values"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valueMismatches"][0]["key"], "A");
    assert_eq!(json["stats"]["valueMismatchCount"], 1);
}

#[test]
fn test_invalid_ignore_regex_is_an_error() {
    let dir = TempDir::new().unwrap();
    dotenv_diff(&dir)
        .args(["compare", "--ignore-regex", "(oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ignore regex"));
}

#[test]
fn test_scan_reports_undeclared_variable() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.ts"), "fetch(process.env.API_URL);\n").unwrap();
    fs::write(dir.path().join(".env"), "PORT=3000\n").unwrap();

    dotenv_diff(&dir)
        .arg("scan")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Used but not declared (1)"))
        .stdout(predicate::str::contains("API_URL"))
        .stdout(predicate::str::contains("Declared but not used (1)"));
}

#[test]
fn test_scan_uses_config_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.ts"), "fetch(process.env.API_URL);\n").unwrap();
    fs::write(
        dir.path().join("dotenv-diff.config.json"),
        r#"{"ignore": ["API_URL"]}"#,
    )
    .unwrap();

    dotenv_diff(&dir)
        .args(["scan", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"missing\": []"));
}

#[test]
fn test_scan_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    dotenv_diff(&dir)
        .args(["scan", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source root not found"));
}
