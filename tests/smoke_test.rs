//! Smoke tests for the Plotkeeper CLI.
//!
//! - `pk --version` outputs version info
//! - `pk --help` lists the command groups
//! - running without a subcommand is a usage error

use assert_cmd::Command;
use predicates::prelude::*;

fn pk() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pk"))
}

#[test]
fn test_version_flag() {
    pk().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pk"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    pk().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("container"))
        .stdout(predicate::str::contains("harvests"));
}

#[test]
fn test_no_args_is_usage_error() {
    pk().assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cell_help() {
    pk().args(["cell", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plant"))
        .stdout(predicate::str::contains("harvest"));
}
