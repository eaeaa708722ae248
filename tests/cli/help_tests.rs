/// CLI help, version and completion output
use crate::common::{cmd, TestContext};
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("skip-client"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--control-port"));
}

#[test]
fn test_play_help() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .args(["play", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sequential"))
        .stdout(predicate::str::contains("--follow"));
}

#[test]
fn test_version_flag() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bash_completions() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip-client"));
}
