// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for configuration loading and top-level usage.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
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

fn write_items(temp: &TempDir) {
    std::fs::write(
        temp.path().join("items.json"),
        r#"[{"type": "workitems", "attributes": {"title": "a"}}]"#,
    )
    .unwrap();
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    witrack(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn version_matches_package() {
    let temp = TempDir::new().unwrap();
    witrack(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    write_items(&temp);

    witrack(&temp)
        .args(["plan", "items.json", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config nope.toml"));
}

#[test]
fn unparsable_config_file_fails() {
    let temp = TempDir::new().unwrap();
    write_items(&temp);
    std::fs::write(temp.path().join("bad.toml"), "base_url = [").unwrap();

    witrack(&temp)
        .args(["plan", "items.json", "--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse config bad.toml"));
}

#[parameterized(
    not_http = { "base_url = \"ftp://tracker\"", "not an http(s) URL" },
    zero_timeout = { "request_timeout_secs = 0", "request_timeout_secs must be positive" },
    inverted_waits = { "[retry]\nmin_wait_ms = 500\nmax_wait_ms = 100", "max_wait_ms (100) is below min_wait_ms (500)" },
    zero_count = { "[batch]\nmax_count = 0", "max_count must be at least 1" },
)]
fn invalid_config_is_rejected(content: &str, message: &str) {
    let temp = TempDir::new().unwrap();
    write_items(&temp);
    std::fs::write(temp.path().join("witrack.toml"), content).unwrap();

    witrack(&temp)
        .args(["plan", "items.json", "--config", "witrack.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"))
        .stderr(predicate::str::contains(message));
}

#[test]
fn user_config_is_read_from_config_dir() {
    let temp = TempDir::new().unwrap();
    write_items(&temp);
    std::fs::create_dir_all(temp.path().join("witrack")).unwrap();
    std::fs::write(
        temp.path().join("witrack").join("config.toml"),
        "[batch]\nmax_count = 7\n",
    )
    .unwrap();

    witrack(&temp)
        .args(["plan", "items.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max 7 per request"));
}

#[test]
fn push_without_server_explains_how_to_configure() {
    let temp = TempDir::new().unwrap();
    write_items(&temp);

    witrack(&temp)
        .args(["push", "items.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no server configured"))
        .stderr(predicate::str::contains("--base-url"));
}

#[test]
fn get_from_unreachable_server_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("witrack.toml"),
        "[retry]\nmax_retries = 0\n",
    )
    .unwrap();

    witrack(&temp)
        .args([
            "get",
            "proj/WI-1",
            "--config",
            "witrack.toml",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: request failed"));
}
