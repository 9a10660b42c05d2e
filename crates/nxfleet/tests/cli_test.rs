//! Integration tests for the `nxfleet` binary.
//!
//! Argument parsing, help, completions, the config subcommands and
//! per-device error reporting, none of which need a live switch.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// `nxfleet` with `NXFLEET_*` cleared and config dirs pointed nowhere.
fn nxfleet_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("nxfleet");
    cmd.env("HOME", "/tmp/nxfleet-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/nxfleet-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("NXFLEET_CONFIG")
        .env_remove("NXFLEET_OUTPUT")
        .env_remove("NXFLEET_PASSWORD")
        .env_remove("NXFLEET_DEFAULT_USERNAME");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

const SAMPLE: &str = r#"
default_username = "admin"

[defaults]
timeout = 30

[devices.leaf1]
address = "192.0.2.11"
password = "hunter2"
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_usage() {
    let output = nxfleet_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_tools() {
    nxfleet_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("NX-OS")
            .and(predicate::str::contains("bgp"))
            .and(predicate::str::contains("interface"))
            .and(predicate::str::contains("route-summary")),
    );
}

#[test]
fn test_version_flag() {
    nxfleet_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nxfleet"));
}

#[test]
fn test_bash_completions() {
    nxfleet_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nxfleet"));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_missing_devices_is_usage_error() {
    let output = nxfleet_cmd().arg("arp").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--devices"));
}

#[test]
fn test_bad_vlan_rejected_before_any_request() {
    let output = nxfleet_cmd()
        .args(["vlan", "-d", "leaf1", "--vlan", "5000"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(combined_output(&output).contains("--vlan"));
}

#[test]
fn test_show_requires_a_show_command() {
    let output = nxfleet_cmd()
        .args(["show", "-d", "leaf1", "reload"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);
    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.0.2.11")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("elsewhere.toml");
    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.toml"));
}

#[test]
fn test_add_and_remove_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);

    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "add-device", "spine1", "--address", "192.0.2.1"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[devices.spine1]"), "{written}");
    assert!(written.contains("192.0.2.1"));
    assert!(written.contains("[devices.leaf1]"));

    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "remove-device", "leaf1"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("leaf1"), "{written}");
}

#[test]
fn test_remove_unknown_device_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);
    let output = nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "remove-device", "nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Device failures ─────────────────────────────────────────────────

#[test]
fn test_unreachable_device_prints_error_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");
    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .env("NXFLEET_DEFAULT_USERNAME", "admin")
        .env("NXFLEET_PASSWORD", "admin")
        .args(["arp", "-d", "127.0.0.1", "--port", "1", "--timeout", "5", "--no-cookies"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("127.0.0.1: error:"));
}

#[test]
fn test_missing_credentials_is_per_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");
    nxfleet_cmd()
        .arg("--config")
        .arg(&path)
        .args(["arp", "-d", "127.0.0.1,127.0.0.2", "--port", "1", "--no-cookies"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("127.0.0.1: error:")
                .and(predicate::str::contains("127.0.0.2: error:")),
        );
}
