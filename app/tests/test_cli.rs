//! FILENAME: tests/test_cli.rs
//! Tests for the command-line entry point: one command in, JSON out.

mod common;

use std::path::Path;
use std::process::Command as Process;

use common::{table_vars, TestHarness, ADMIN};
use dashboard_lib::{run_command, Command};
use serde_json::{json, Value};

/// A deployment with two repository files for PPC.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let fixture = json!({
        "tables": {
            "users": {
                "schema": {"partition_key": "uni"},
                "items": [{"uni": ADMIN, "roles": ["admin"]}]
            },
            "access_logs": {
                "schema": {"partition_key": "uni", "sort_key": "entry_id"}
            },
            "repository": {
                "schema": {
                    "partition_key": "key",
                    "indexes": [{"name": "unit-year-index", "partition_key": "unit", "sort_key": "year"}]
                },
                "items": [
                    {"key": "PPC/Budget.pdf", "unit": "PPC", "year": "2020", "file_name": "Budget.pdf"},
                    {"key": "PPC/Agenda.pdf", "unit": "PPC", "year": "2019", "file_name": "Agenda.pdf"}
                ]
            }
        }
    });
    let path = dir.join("fixture.json");
    std::fs::write(&path, serde_json::to_string_pretty(&fixture).unwrap()).unwrap();
    path
}

// ============================================================================
// LIBRARY ENTRY POINT
// ============================================================================

#[test]
fn test_run_command_returns_parseable_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = TestHarness::new().config;
    config.fixture_path = Some(write_fixture(dir.path()));

    let output = run_command(
        &config,
        ADMIN,
        &Command::Repository {
            unit: "PPC".to_string(),
            year: None,
        },
    )
    .unwrap();

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["unit"], json!("PPC"));
    assert_eq!(value["year"], Value::Null);
    assert_eq!(
        value["year_options"],
        json!([
            {"label": "All", "value": ""},
            {"label": "2019/20", "value": "2020"},
            {"label": "2018/19", "value": "2019"}
        ])
    );
}

// ============================================================================
// BINARY
// ============================================================================

#[test]
fn test_binary_stdout_is_only_json() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());

    let output = Process::new(env!("CARGO_BIN_EXE_dashboard"))
        .env_clear()
        .envs(table_vars())
        .env("DASHBOARD_FIXTURE", &fixture)
        .args([ADMIN, "repository", "PPC"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["unit"], json!("PPC"));

    // log lines go to stderr, debug lines are filtered at the default level
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("|I|REPO|unit=PPC"));
    assert!(!stderr.contains("|D|"));
}

#[test]
fn test_binary_usage_error_exits_with_2() {
    let output = Process::new(env!("CARGO_BIN_EXE_dashboard"))
        .env_clear()
        .args([ADMIN])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("usage: dashboard"));
}
