/// Scenario listing from the built-in demo, files and the config file
use crate::common::{cmd, two_scenarios_json, TestContext};
use predicates::prelude::*;

#[test]
fn test_list_builtin_demo() {
    let ctx = TestContext::default();
    cmd(&ctx)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1  spreadsheet (6 steps)"));
}

#[test]
fn test_list_json_scenario_file() {
    let ctx = TestContext::default();
    let path = ctx
        .create_file("scenarios.json", two_scenarios_json())
        .unwrap();
    cmd(&ctx)
        .arg("list")
        .arg("--scenarios")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1  unnamed (1 steps)"))
        .stdout(predicate::str::contains("2  unnamed (2 steps)"));
}

#[test]
fn test_list_toml_scenarios_from_config() {
    let ctx = TestContext::default();
    ctx.create_file(
        "cells.toml",
        r#"
            [[scenarios]]
            name = "cells"

            [[scenarios.steps]]
            type = "log"
            payload = { resource = "computed" }
        "#,
    )
    .unwrap();
    ctx.create_file(".skip-client.toml", "[scenarios]\npath = \"cells.toml\"\n")
        .unwrap();
    cmd(&ctx)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1  cells (1 steps)"));
}
