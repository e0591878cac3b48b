// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `witrack diff` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use yare::parameterized;

fn witrack(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("witrack");
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write(temp: &TempDir, name: &str, value: &Value) {
    std::fs::write(temp.path().join(name), value.to_string()).unwrap();
}

fn baseline() -> Value {
    json!({"data": {
        "type": "workitems",
        "id": "proj/WI-1",
        "revision": "3",
        "attributes": {
            "title": "Crash on save",
            "status": "open",
            "priority": "high",
            "created": "2024-05-01T10:00:00Z",
        },
        "relationships": {"assignee": {"data": [{"type": "users", "id": "alice"}]}},
    }})
}

#[test]
fn unchanged_resource_reports_no_changes() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &baseline());

    witrack(&temp)
        .args(["diff", "a.json", "b.json"])
        .assert()
        .success()
        .stdout("no changes\n");
}

#[test]
fn equivalent_timestamp_is_not_a_change() {
    let temp = TempDir::new().unwrap();
    let mut modified = baseline();
    modified["data"]["attributes"]["created"] = json!("2024-05-01T12:00:00+02:00");
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &modified);

    witrack(&temp)
        .args(["diff", "a.json", "b.json"])
        .assert()
        .success()
        .stdout("no changes\n");
}

#[test]
fn changed_fields_print_patch_body() {
    let temp = TempDir::new().unwrap();
    let mut modified = baseline();
    modified["data"]["attributes"]["status"] = json!("closed");
    modified["data"]["attributes"]["priority"] = json!("low");
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &modified);

    let output = witrack(&temp)
        .args(["diff", "a.json", "b.json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    similar_asserts::assert_eq!(
        body,
        json!({"data": {
            "type": "workitems",
            "id": "proj/WI-1",
            "revision": "3",
            "attributes": {"status": "closed", "priority": "low"},
        }})
    );
}

#[test]
fn modified_without_id_inherits_baseline() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.json", &baseline());
    write(
        &temp,
        "b.json",
        &json!({"type": "workitems", "attributes": {"title": "Crash on load"}}),
    );

    witrack(&temp)
        .args(["diff", "a.json", "b.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"proj/WI-1\""))
        .stdout(predicate::str::contains("\"title\": \"Crash on load\""));
}

#[parameterized(
    project = { "project" },
    user = { "user" },
)]
fn wrong_type_flag_fails(resource_type: &str) {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &baseline());

    witrack(&temp)
        .args(["diff", "a.json", "b.json", "--type", resource_type])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn unknown_type_lists_valid_types() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &baseline());

    witrack(&temp)
        .args(["diff", "a.json", "b.json", "-t", "widget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown resource type 'widget'"))
        .stderr(predicate::str::contains("work_item, project, user"));
}

#[test]
fn standard_field_with_wrong_kind_fails() {
    let temp = TempDir::new().unwrap();
    let mut modified = baseline();
    modified["data"]["attributes"]["created"] = json!("yesterday");
    write(&temp, "a.json", &baseline());
    write(&temp, "b.json", &modified);

    witrack(&temp)
        .args(["diff", "a.json", "b.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("created"));
}

#[test]
fn missing_file_fails() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.json", &baseline());

    witrack(&temp)
        .args(["diff", "a.json", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("io error"));
}
