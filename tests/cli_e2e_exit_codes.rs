//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Fatal error or at least one failed reconciliation action
//! - Exit code 2: Invalid command-line usage (handled by clap)

#[allow(dead_code)]
mod common;
#[allow(unused_imports)]
use common::prelude::*;

#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("submodule-sync");
    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("submodule-sync");
    cmd.arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("submodule-sync"));
}

#[test]
fn test_exit_code_missing_subcommand() {
    let mut cmd = cargo_bin_cmd!("submodule-sync");
    cmd.assert().code(2);
}

#[test]
fn test_exit_code_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("submodule-sync");
    cmd.arg("sync").arg("--no-such-flag").assert().code(2);
}

#[test]
fn test_exit_code_success_on_clean_sync() {
    let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
    fixture.sync().assert().code(0);
}

#[test]
fn test_exit_code_failure_on_failed_action() {
    let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
    fixture.sync_with("false").assert().code(1);
}

#[test]
fn test_exit_code_invalid_log_level() {
    let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
    fixture
        .sync()
        .arg("--log-level")
        .arg("loud")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown log level"));
}
