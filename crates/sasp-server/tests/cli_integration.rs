//! CLI integration tests for the sasp-server binary

use assert_cmd::Command;
use predicates::prelude::*;

fn sasp_server() -> Command {
    Command::cargo_bin("sasp-server")
        .expect("Failed to locate sasp-server binary - ensure it's built before running tests")
}

#[test]
fn test_cli_help() {
    sasp_server()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SASP QUIC server"))
        .stdout(predicate::str::contains("--role-binding"))
        .stdout(predicate::str::contains("--no-meta"));
}

#[test]
fn test_cli_rejects_unknown_role_binding() {
    sasp_server()
        .args(["--role-binding", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role binding"));
}

#[test]
fn test_cli_missing_config_file() {
    sasp_server()
        .args(["--config", "/nonexistent/sasp/server.toml", "--no-meta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
