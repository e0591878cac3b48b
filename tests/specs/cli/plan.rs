// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `witrack plan` command.

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

/// Writes `count` work items that each encode to 47 bytes.
fn write_items(temp: &TempDir, count: usize) {
    let data: Vec<Value> = (0..count)
        .map(|_| json!({"type": "workitems", "attributes": {"title": "a"}}))
        .collect();
    std::fs::write(
        temp.path().join("items.json"),
        json!({ "data": data }).to_string(),
    )
    .unwrap();
}

fn plan_json(temp: &TempDir, args: &[&str]) -> Value {
    let output = witrack(temp)
        .args(["plan", "items.json", "-o", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "plan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn default_limits_fit_one_request() {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 5);

    witrack(&temp)
        .args(["plan", "items.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "5 resources in 1 request (max 100 per request, 2097152 bytes)",
        ));
}

#[parameterized(
    one_per_request = { "1", 5 },
    two_per_request = { "2", 3 },
    all_in_one = { "5", 1 },
)]
fn max_count_flag_splits_requests(max_count: &str, requests: usize) {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 5);

    let plan = plan_json(&temp, &["--max-count", max_count]);

    assert_eq!(plan["batches"].as_array().unwrap().len(), requests);
    let items: Vec<u64> = plan["batches"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|b| b["items"].as_array().unwrap().clone())
        .map(|i| i.as_u64().unwrap())
        .collect();
    assert_eq!(items, vec![0, 1, 2, 3, 4]);
}

#[test]
fn max_bytes_flag_splits_requests() {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 3);

    // 11 + 47 + 1 + 47 = 106 fits, a third item does not
    let plan = plan_json(&temp, &["--max-bytes", "110"]);

    assert_eq!(plan["batches"][0]["bytes"], json!(106));
    assert_eq!(plan["batches"][1]["bytes"], json!(58));
}

#[test]
fn oversized_item_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("items.json"),
        json!([
            {"type": "workitems", "attributes": {"title": "a"}},
            {"type": "workitems", "attributes": {"title": "a", "notes": "x".repeat(300)}},
        ])
        .to_string(),
    )
    .unwrap();

    witrack(&temp)
        .args(["plan", "items.json", "--max-bytes", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 resources in 1 request"))
        .stdout(predicate::str::contains("skipped 1 resource too large to send:"))
        .stdout(predicate::str::contains("  item 1: "));
}

#[test]
fn config_file_limits_apply() {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 4);
    std::fs::write(
        temp.path().join("witrack.toml"),
        "[batch]\nmax_count = 3\n",
    )
    .unwrap();

    let plan = plan_json(&temp, &["--config", "witrack.toml"]);

    assert_eq!(plan["max_count"], json!(3));
    assert_eq!(plan["batches"].as_array().unwrap().len(), 2);
}

#[test]
fn flag_overrides_config_file() {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 4);
    std::fs::write(
        temp.path().join("witrack.toml"),
        "[batch]\nmax_count = 3\n",
    )
    .unwrap();

    let plan = plan_json(&temp, &["--config", "witrack.toml", "--max-count", "4"]);

    assert_eq!(plan["batches"].as_array().unwrap().len(), 1);
}

#[test]
fn zero_max_count_fails() {
    let temp = TempDir::new().unwrap();
    write_items(&temp, 1);

    witrack(&temp)
        .args(["plan", "items.json", "--max-count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid batch limits"));
}

#[test]
fn bad_item_is_reported_with_index() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("items.json"),
        json!([
            {"type": "workitems"},
            {"type": "workitems", "attributes": {"dueDate": 42}},
        ])
        .to_string(),
    )
    .unwrap();

    witrack(&temp)
        .args(["plan", "items.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("item 1:"))
        .stderr(predicate::str::contains("dueDate"));
}
