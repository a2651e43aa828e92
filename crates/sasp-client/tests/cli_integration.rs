//! CLI integration tests
//!
//! Tests the sasp-client binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;

fn sasp_client() -> Command {
    Command::cargo_bin("sasp-client")
        .expect("Failed to locate sasp-client binary - ensure it's built before running tests")
}

#[test]
fn test_cli_help() {
    sasp_client()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Send commands to a SASP server"))
        .stdout(predicate::str::contains("--insecure"));
}

#[test]
fn test_cli_version() {
    sasp_client()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sasp-client"));
}

#[test]
fn test_cli_requires_commands() {
    sasp_client()
        .args(["--insecure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_rejects_unknown_role_binding() {
    sasp_client()
        .args(["--role-binding", "sideways", "--insecure", "START"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role binding"));
}

#[test]
fn test_cli_requires_insecure() {
    sasp_client()
        .env("HOME", std::env::temp_dir())
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("sasp-client-test-none"))
        .arg("START")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--insecure"));
}
