//! Tests for `kmsenv print`.

use crate::support::*;

#[test]
fn test_print_sorted_and_quoted() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.print("env.yml", &[]);

    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "APP_NAME=billing\n\
         EMPTY=''\n\
         GREETING='hello world'\n\
         LOG_LEVEL=info\n\
         QUOTED='it'\"'\"'s here'\n\
         STAGE_NAME=test\n"
    );
}

#[test]
fn test_print_single_line() {
    let t = Test::with_file("env.yml", "B: two\nA: one\n");

    let output = t.print("env.yml", &["--single-line"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "A=one B=two\n");
}

#[test]
fn test_print_export() {
    let t = Test::with_file("env.yml", "B: two words\nA: one\n");

    let output = t.print("env.yml", &["--export"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "export A=one;\nexport B='two words';\n");
}

#[test]
fn test_print_json() {
    let t = Test::with_file("env.yml", "B: two\nA: one\n");

    let output = t.print("env.yml", &["--json"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "{\n  \"A\": \"one\",\n  \"B\": \"two\"\n}\n");
}

#[test]
fn test_print_json_single_line() {
    let t = Test::with_file("env.yml", "B: two\nA: one\n");

    let output = t.print("env.yml", &["--json", "--single-line"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "{\"A\":\"one\",\"B\":\"two\"}\n");
}

#[test]
fn test_print_pending_values_unwrapped() {
    let t = Test::with_file("env.yml", PENDING);

    let output = t.print("env.yml", &[]);

    assert_success(&output);
    assert!(stdout(&output).contains("TOKEN=s3cr3t\n"));
}

#[test]
fn test_print_only_unencrypted_skips_ciphertext() {
    // The ciphertext is never sent to KMS, so no AWS access is needed.
    let t = Test::with_file(
        "env.yml",
        "APP_NAME: billing\nSTAGE_NAME: test\nSECRET:\n  encrypted: Zm9v\nPLAIN: yes-really\n",
    );

    let output = t.print("env.yml", &["--only-unencrypted"]);

    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "APP_NAME=billing\nPLAIN=yes-really\nSTAGE_NAME=test\n"
    );
}

#[test]
fn test_print_export_conflicts_with_json() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.print("env.yml", &["--export", "--json"]);

    assert_failure(&output);
}
