//! CLI end-to-end tests
//!
//! Tests for the menuql command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the menuql binary
#[allow(deprecated)]
fn menuql_cmd() -> Command {
    Command::cargo_bin("menuql").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = menuql_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = menuql_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("menuql"))
        .stdout(predicate::str::contains("query"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = menuql_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("menuql "));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = menuql_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("0.0.0.0:8080"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menuql.json");
    fs::write(
        &path,
        r#"{"server": {"host": "127.0.0.1", "port": 9090}, "database": {"pool_size": 0}}"#,
    )
    .unwrap();

    let mut cmd = menuql_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("127.0.0.1:9090"))
        .stdout(predicate::str::contains("pool_size is 0"));
}

#[test]
fn test_cli_validate_rejects_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let mut cmd = menuql_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn test_cli_query_in_memory() {
    let mut cmd = menuql_cmd();
    cmd.args([
        "query",
        "--memory",
        "SELECT m.menuName FROM Menu m WHERE m.menuCode = 7",
    ])
    .assert()
    .success()
    .stdout(predicate::str::diff("민트미역국\n"));
}

#[test]
fn test_cli_query_json_output() {
    let output = menuql_cmd()
        .args([
            "query",
            "--memory",
            "--json",
            "SELECT m FROM Menu m WHERE m.categoryCode IN (6, 10) ORDER BY m.menuCode",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| {
        let code = r["categoryCode"].as_i64().unwrap();
        code == 6 || code == 10
    }));
}

#[test]
fn test_cli_query_explain() {
    let mut cmd = menuql_cmd();
    cmd.args([
        "query",
        "--memory",
        "--explain",
        "SELECT DISTINCT m.categoryCode FROM Menu m",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "SELECT DISTINCT t0.category_code FROM tbl_menu t0",
    ));
}

#[test]
fn test_cli_query_against_file_database() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("menu.db");
    let config_path = dir.path().join("menuql.json");
    fs::write(
        &config_path,
        serde_json::json!({ "server": { "db_path": db_path } }).to_string(),
    )
    .unwrap();

    let mut cmd = menuql_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["query", "SELECT c.categoryName FROM Category c WHERE c.categoryCode = 2"])
        .assert()
        .success()
        .stdout(predicate::str::diff("음료\n"));
    assert!(db_path.exists());
}

#[test]
fn test_cli_query_syntax_error_fails() {
    let mut cmd = menuql_cmd();
    cmd.args(["query", "--memory", "SELECT FROM Menu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"));
}
