//! Tests for input errors and CLI flags.
//!
//! None of these reach the network: every failure happens before the first
//! write.

use predicates::prelude::*;

use crate::support::*;

const UNUSED_API: &str = "http://127.0.0.1:9";

#[test]
fn test_help_lists_rotate() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "rotate");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "keyrot");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_keyrot") || out.contains("complete"));
}

#[test]
fn test_malformed_pairs_fail() {
    let t = Test::new();

    let output = t.rotate(UNUSED_API, "[{name: SVC}]", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "malformed credential pairs");
    assert_stderr_contains(&output, "pairs must look like");
}

#[test]
fn test_empty_pairs_fail() {
    let t = Test::new();

    let output = t.rotate(UNUSED_API, "[]", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no credential pairs to rotate");
}

#[test]
fn test_invalid_name_fails() {
    let t = Test::new();

    let output = t.rotate(UNUSED_API, &pairs_json(&[("GITHUB_SVC", "a", "b")]), &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "GITHUB_");
}

#[test]
fn test_missing_pairs_fail() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["rotate", "--token", "ghp_test", "--repository", "octo/hello"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing credential pairs");
}

#[test]
fn test_missing_token_fails() {
    let t = Test::new();

    t.cmd()
        .args(["rotate", "--repository", "octo/hello", "--pairs", SINGLE_PAIR])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing access token"))
        .stderr(predicate::str::contains("INPUT_TOKEN"));
}

#[test]
fn test_inputs_are_read_from_environment() {
    let t = Test::new();

    // Everything but the token comes from workflow inputs.
    let output = t
        .cmd()
        .args(["rotate"])
        .env("INPUT_PAIRS", SINGLE_PAIR)
        .env("INPUT_REPOSITORY", "octo/hello")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing access token");
}

#[test]
fn test_missing_repository_fails() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["rotate", "--token", "ghp_test", "--pairs", SINGLE_PAIR])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing target repository");
}

#[test]
fn test_invalid_repository_fails() {
    let t = Test::new();

    let output = t
        .cmd()
        .args([
            "rotate",
            "--token",
            "ghp_test",
            "--repository",
            "just-a-name",
            "--pairs",
            SINGLE_PAIR,
        ])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "expected owner/name");
}

#[test]
fn test_selected_visibility_requires_ids() {
    let t = Test::new();

    let output = t.rotate(
        UNUSED_API,
        SINGLE_PAIR,
        &["--org", "true", "--visibility", "selected"],
    );
    assert_failure(&output);
    assert_stderr_contains(&output, "requires at least one repository id");
}

#[test]
fn test_unknown_config_key_fails() {
    let t = Test::new();
    let config = t.write("keyrot.toml", "token = \"ghp_from_file\"\n");

    let output = t.rotate(
        UNUSED_API,
        SINGLE_PAIR,
        &["--config", config.to_str().unwrap()],
    );
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
    assert_stderr_contains(&output, "unknown field");
}

#[test]
fn test_secret_values_never_printed() {
    let t = Test::new();
    let pairs = pairs_json(&[("1BAD", "PUBLIC_SENTINEL", "PRIVATE_SENTINEL")]);

    let output = t.rotate(UNUSED_API, &pairs, &[]);
    assert_failure(&output);
    assert_output_excludes(&output, "PRIVATE_SENTINEL");
    assert_output_excludes(&output, "ghp_test");
}

#[test]
fn test_error_annotation_in_workflow() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["rotate", "--token", "ghp_test", "--pairs", "[]"])
        .args(["--repository", "octo/hello"])
        .env("GITHUB_ACTIONS", "true")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stdout_contains(&output, "::error::no credential pairs to rotate");
}
