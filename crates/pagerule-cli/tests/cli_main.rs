//! Basic CLI tests for the pagerule command-line interface.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const DEFINITIONS: &str = r##"{
    "extensions": {"banner": true, "survey": false},
    "pages": {
        "homepage\\?foo=bar#anchor": [
            {"rules": [{"name": "firstRule"}]},
            {"rules": [{"name": "secondRule"}, {"name": "unreached"}]}
        ],
        "page": [{"rules": [{"name": "thirdRule"}]}],
        "other": [{"rules": [{"name": "fourthRule"}]}]
    }
}"##;

fn definitions_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn pagerule() -> Command {
    let mut cmd = Command::cargo_bin("pagerule").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PAGERULE_LOG")
        .env_remove("PAGERULE_LOG_JSON");
    cmd
}

/// Test that the CLI binary exists and lists its commands.
#[test]
fn test_cli_help() {
    pagerule()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("preview"));
}

/// Test that the CLI shows version information.
#[test]
fn test_cli_version() {
    pagerule()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pagerule"));
}

/// Test that validate reports pattern, group and rule counts.
#[test]
fn test_validate_counts() {
    let file = definitions_file(DEFINITIONS);

    pagerule()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Patterns:   3"))
        .stdout(predicate::str::contains("Groups:     4"))
        .stdout(predicate::str::contains("Rules:      5"))
        .stdout(predicate::str::contains("Extensions: banner"));
}

/// Test that validate fails on a pattern that does not compile.
#[test]
fn test_validate_rejects_bad_pattern() {
    let file = definitions_file(r#"{"pages": {"home(": []}}"#);

    pagerule()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("home("));
}

/// Test that validate fails on malformed JSON.
#[test]
fn test_validate_rejects_malformed_json() {
    let file = definitions_file("{ not json");

    pagerule()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load definitions"));
}

/// Test that validate fails when the file does not exist.
#[test]
fn test_validate_missing_file() {
    pagerule()
        .args(["validate", "/nonexistent/pagerule.json"])
        .assert()
        .failure();
}

/// Test that preview prints the first rule of each matching group.
#[test]
fn test_preview_lists_applied_rules() {
    let file = definitions_file(DEFINITIONS);

    pagerule()
        .arg("preview")
        .arg(file.path())
        .args(["--location", "https://shop.example/homepage?foo=bar#anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Location: /homepage?foo=bar#anchor"))
        .stdout(predicate::str::contains("[group 0] firstRule"))
        .stdout(predicate::str::contains("[group 1] secondRule"))
        .stdout(predicate::str::contains("page [group 0] thirdRule"))
        .stdout(predicate::str::contains("unreached").not())
        .stdout(predicate::str::contains("fourthRule").not());
}

/// Test that preview can emit the match report as JSON.
#[test]
fn test_preview_json() {
    let file = definitions_file(DEFINITIONS);

    let output = pagerule()
        .arg("preview")
        .arg(file.path())
        .args(["--location", "/homepage", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["location"], "/homepage");
    assert_eq!(report["matched_patterns"], serde_json::json!(["page"]));
    assert_eq!(report["applied"][0]["rule"]["name"], "thirdRule");
}

/// Test that preview says so when no pattern matches.
#[test]
fn test_preview_without_match() {
    let file = definitions_file(DEFINITIONS);

    pagerule()
        .arg("preview")
        .arg(file.path())
        .args(["--location", "/checkout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No page pattern matches."));
}

/// Test that the definitions path falls back to the environment.
#[test]
fn test_definitions_path_from_env() {
    let file = definitions_file(DEFINITIONS);

    pagerule()
        .env("PAGERULE_DEFINITIONS", file.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Patterns:   3"));
}
