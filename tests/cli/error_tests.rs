/// Startup failures exit non-zero without contacting the service
use crate::common::{cmd, two_scenarios_json, TestContext};
use predicates::prelude::*;

#[test]
fn test_missing_scenario_file() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .args(["list", "--scenarios", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load scenarios"));
}

#[test]
fn test_invalid_scenario_file() {
    let ctx = TestContext::default();
    let path = ctx.create_file("broken.json", "[[{\"type\": ").unwrap();
    cmd(&ctx)
        .arg("list")
        .arg("--scenarios")
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn test_play_unknown_scenario() {
    let ctx = TestContext::default();
    let path = ctx
        .create_file("scenarios.json", two_scenarios_json())
        .unwrap();
    cmd(&ctx)
        .args(["play", "5", "--scenarios"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scenario 5 does not exist"));
}

#[test]
fn test_unknown_subcommand() {
    let ctx = TestContext::default();
    cmd(&ctx).arg("replay").assert().failure();
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let ctx = TestContext::default();
    ctx.create_file(".skip-client.toml", "[service\nhost = ")
        .unwrap();
    cmd(&ctx)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("spreadsheet"))
        .stderr(predicate::str::contains("Failed to load config"));
}
