//! Integration tests for the `vmdash` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live vmrest daemon.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vmdash` binary with env isolation.
///
/// Clears all relevant env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vmdash_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vmdash");
    cmd.env("HOME", "/tmp/vmdash-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vmdash-cli-test-nonexistent")
        .env_remove("VMDASH_PROFILE")
        .env_remove("VMDASH_OUTPUT")
        .env_remove("VMDASH_INSECURE")
        .env_remove("VMDASH_TIMEOUT")
        .env_remove("VMREST_URL")
        .env_remove("VMREST_USERNAME")
        .env_remove("VMREST_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vmdash_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    vmdash_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("vmrest")
            .and(predicate::str::contains("vms"))
            .and(predicate::str::contains("power"))
            .and(predicate::str::contains("networks")),
    );
}

#[test]
fn test_version_flag() {
    vmdash_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vmdash"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    vmdash_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    vmdash_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = vmdash_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_vms_list_no_daemon_config() {
    vmdash_cmd().args(["vms", "list"]).assert().failure().stderr(
        predicate::str::contains("config")
            .or(predicate::str::contains("Configuration"))
            .or(predicate::str::contains("host"))
            .or(predicate::str::contains("profile")),
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    vmdash_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_invalid_output_format() {
    let output = vmdash_cmd()
        .args(["--output", "invalid", "vms", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values") || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing daemon config, not about argument parsing.
    vmdash_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "vms",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("host"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_vms_subcommands_exist() {
    vmdash_cmd().args(["vms", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("clone"))
            .and(predicate::str::contains("register"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_power_subcommands_exist() {
    vmdash_cmd()
        .args(["power", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("on")
                .and(predicate::str::contains("off"))
                .and(predicate::str::contains("shutdown"))
                .and(predicate::str::contains("suspend"))
                .and(predicate::str::contains("pause"))
                .and(predicate::str::contains("unpause")),
        );
}

#[test]
fn test_portforward_subcommands_exist() {
    vmdash_cmd()
        .args(["portforward", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("set")));
}

#[test]
fn test_config_subcommands_exist() {
    vmdash_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path")),
        );
}
