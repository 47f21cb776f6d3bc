//! Tests for `kmsenv exec`.

use crate::support::*;

#[test]
fn test_exec_injects_values() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.exec("env.yml", &["sh", "-c", "echo \"$GREETING/$STAGE_NAME\""]);

    assert_success(&output);
    assert_eq!(stdout(&output), "hello world/test\n");
}

#[test]
fn test_exec_unwraps_pending_values() {
    let t = Test::with_file("env.yml", PENDING);

    let output = t.exec("env.yml", &["sh", "-c", "echo \"$TOKEN\""]);

    assert_success(&output);
    assert_eq!(stdout(&output), "s3cr3t\n");
}

#[test]
fn test_exec_exit_code_passthrough() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.exec("env.yml", &["sh", "-c", "exit 42"]);

    assert_eq!(output.status.code(), Some(42));
}

#[test]
fn test_exec_passes_child_arguments_through() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.exec("env.yml", &["echo", "-n", "--flag"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "--flag");
}

#[test]
fn test_exec_without_command() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t
        .cmd()
        .args(["exec", "-f", "env.yml"])
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "no command to execute provided");
}

#[test]
fn test_exec_only_separator() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.exec("env.yml", &[]);

    assert_failure(&output);
    assert_stderr_contains(&output, "no command to execute provided");
}

#[test]
fn test_exec_missing_program() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.exec("env.yml", &["kmsenv-no-such-program"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "failed to run kmsenv-no-such-program");
}
