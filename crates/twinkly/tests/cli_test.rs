//! Integration tests for the `twinkly` CLI binary.
//!
//! Argument parsing, completions, config handling and error exit codes run
//! without a device; the device commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `twinkly` binary with env isolation.
///
/// Clears all `TWINKLY_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn twinkly_cmd_in(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("twinkly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("TWINKLY_HOST")
        .env_remove("TWINKLY_OUTPUT")
        .env_remove("TWINKLY_TIMEOUT")
        .env_remove("TWINKLY_POLL_INTERVAL_SECS")
        .env_remove("TWINKLY_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn twinkly_cmd() -> assert_cmd::Command {
    twinkly_cmd_in(std::path::Path::new("/tmp/twinkly-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_json(server: &MockServer, verb: &str, suffix: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(format!("/xled/v1/{suffix}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A device that is on at native brightness 50.
async fn mock_device() -> MockServer {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "login",
        json!({
            "authentication_token": "tok-cli",
            "authentication_token_expires_in": 14400,
            "challenge-response": "00",
            "code": 1000
        }),
    )
    .await;
    mount_json(&server, "POST", "verify", json!({ "code": 1000 })).await;
    mount_json(&server, "POST", "logout", json!({ "code": 1000 })).await;
    mount_json(
        &server,
        "GET",
        "gestalt",
        json!({
            "uuid": "00000000-0000-0000-0000-0000000000cc",
            "mac": "98:cd:ac:00:00:cc",
            "product_code": "TWW210SPP",
            "device_name": "Porch",
            "number_of_led": 210,
            "code": 1000
        }),
    )
    .await;
    mount_json(&server, "GET", "fw/version", json!({ "version": "2.8.11", "code": 1000 })).await;
    mount_json(&server, "GET", "led/mode", json!({ "mode": "movie", "code": 1000 })).await;
    mount_json(
        &server,
        "GET",
        "led/out/brightness",
        json!({ "mode": "enabled", "value": 50, "code": 1000 }),
    )
    .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = twinkly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    twinkly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("status")
            .and(predicate::str::contains("brightness"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    twinkly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("twinkly"));
}

#[test]
fn test_completions_zsh() {
    twinkly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_status_without_devices_is_config_error() {
    twinkly_cmd()
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No devices configured"));
}

#[test]
fn test_host_with_scheme_is_rejected() {
    twinkly_cmd()
        .args(["--host", "http://10.0.0.5", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scheme"));
}

#[test]
fn test_brightness_out_of_range_is_usage_error() {
    let output = twinkly_cmd()
        .args(["--host", "10.0.0.5", "brightness", "300"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("300"), "Expected the bad value in output:\n{text}");
}

#[test]
fn test_unreachable_device_is_not_exposed() {
    twinkly_cmd()
        .args(["--host", "127.0.0.1:1", "--timeout", "1", "status"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("could not be set up"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();

    twinkly_cmd_in(home.path())
        .args(["--host", "10.0.0.5", "--name", "Tree", "--kind", "switch", "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    twinkly_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.0.0.5")
                .and(predicate::str::contains("Tree"))
                .and(predicate::str::contains("switch")),
        );
}

#[test]
fn test_config_path_points_into_config_home() {
    let home = tempfile::tempdir().unwrap();
    twinkly_cmd_in(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_reports_state() {
    let server = mock_device().await;
    let host = server.address().to_string();

    let output = twinkly_cmd()
        .args(["--host", &host, "--name", "Porch", "-o", "json", "status"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let views: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let view = &views[0];
    assert_eq!(view["name"], "Porch");
    assert_eq!(view["available"], true);
    assert_eq!(view["power"], true);
    assert_eq!(view["brightness"], 127.5);
    assert_eq!(view["brightness_native"], 50);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_on_with_brightness_sends_native_value() {
    let server = mock_device().await;
    Mock::given(method("POST"))
        .and(path("/xled/v1/led/out/brightness"))
        .and(body_json(json!({ "type": "A", "mode": "enabled", "value": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 1000 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/xled/v1/led/mode"))
        .and(body_json(json!({ "mode": "movie" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 1000 })))
        .expect(1)
        .mount(&server)
        .await;

    let host = server.address().to_string();
    twinkly_cmd()
        .args(["--host", &host, "-o", "plain", "on", "--brightness", "128"])
        .assert()
        .success()
        .stdout(predicate::str::contains("online\ton\t127.5"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brightness_on_switch_is_unsupported() {
    let server = mock_device().await;
    let host = server.address().to_string();

    twinkly_cmd()
        .args(["--host", &host, "--kind", "switch", "brightness", "10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not supported"));
}
