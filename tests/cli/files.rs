//! Tests for `kmsenv encrypt-file`, `decrypt-file` and `edit`.

use crate::support::*;
use serde_yaml::Value;

fn yaml(src: &str) -> Value {
    serde_yaml::from_str(src).unwrap()
}

#[cfg(unix)]
fn script(t: &Test, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = t.write(name, &format!("#!/bin/sh\n{}\n", body));
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[test]
fn test_encrypt_file_plain_only_is_unchanged() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.encrypt_file("env.yml");

    assert_success(&output);
    assert!(stdout(&output).contains("encrypted"));
    assert_eq!(yaml(&t.read("env.yml")), yaml(PLAIN));
}

#[test]
fn test_decrypt_file_plain_only_is_unchanged() {
    let t = Test::with_file("env.yml", PENDING);

    let output = t.decrypt_file("env.yml");

    assert_success(&output);
    assert_eq!(yaml(&t.read("env.yml")), yaml(PENDING));
}

#[test]
fn test_encrypt_file_keeps_entry_order() {
    let t = Test::with_file("env.yml", "Z: last\nA: first\nM: middle\n");

    assert_success(&t.encrypt_file("env.yml"));

    assert_eq!(t.read("env.yml"), "Z: last\nA: first\nM: middle\n");
}

#[test]
fn test_encrypt_file_missing_file() {
    let t = Test::new();

    let output = t.encrypt_file("nope.yml");

    assert_failure(&output);
    assert_stderr_contains(&output, "file does not exist");
}

#[test]
fn test_encrypt_file_without_reserved_keys() {
    let t = Test::with_file("env.yml", NO_RESERVED);

    let output = t.encrypt_file("env.yml");

    assert_failure(&output);
    assert_stderr_contains(&output, "missing APP_NAME");
    assert_stderr_contains(&output, "add APP_NAME and STAGE_NAME");
    assert_eq!(t.read("env.yml"), NO_RESERVED);
}

#[test]
fn test_encrypt_file_invalid_value() {
    let t = Test::with_file("env.yml", "APP_NAME: a\nSTAGE_NAME: b\nLIST: [1, 2]\n");

    let output = t.encrypt_file("env.yml");

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for LIST");
}

#[test]
fn test_decrypt_file_not_a_mapping() {
    let t = Test::with_file("env.yml", "- just\n- a list\n");

    let output = t.decrypt_file("env.yml");

    assert_failure(&output);
    assert_stderr_contains(&output, "document is not a mapping");
}

#[cfg(unix)]
#[test]
fn test_edit_include_kept_as_plain_entry() {
    let include = "s3://bucket/shared.yml?versionId=1";
    let t = Test::with_file("env.yml", &format!("APP_NAME: a\ninclude: {}\n", include));

    // Nothing is fetched: the include stays an ordinary entry.
    let output = t.edit("env.yml", "true");

    assert_success(&output);
    assert_eq!(yaml(&t.read("env.yml"))["include"], Value::from(include));
}

#[cfg(unix)]
#[test]
fn test_edit_no_change() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.edit("env.yml", "true");

    assert_success(&output);
    assert!(stdout(&output).contains("edited"));
    assert_eq!(yaml(&t.read("env.yml")), yaml(PLAIN));
}

#[cfg(unix)]
#[test]
fn test_edit_applies_changes() {
    let t = Test::with_file("env.yml", PLAIN);
    let editor = script(&t, "editor.sh", "echo 'ADDED: by editor' >> \"$1\"");

    let output = t.edit("env.yml", &editor);

    assert_success(&output);
    let doc = yaml(&t.read("env.yml"));
    assert_eq!(doc["ADDED"], Value::from("by editor"));
    assert_eq!(doc["GREETING"], Value::from("hello world"));
}

#[cfg(unix)]
#[test]
fn test_edit_editor_failure_leaves_file() {
    let t = Test::with_file("env.yml", PLAIN);
    let editor = script(&t, "editor.sh", "echo 'ADDED: x' >> \"$1\"\nexit 3");

    let output = t.edit("env.yml", &editor);

    assert_failure(&output);
    assert_stderr_contains(&output, "editor failed with return code 3");
    assert_eq!(t.read("env.yml"), PLAIN);
}

#[cfg(unix)]
#[test]
fn test_edit_invalid_result_leaves_file() {
    let t = Test::with_file("env.yml", PLAIN);
    let editor = script(&t, "editor.sh", "echo 'BAD: [1]' >> \"$1\"");

    let output = t.edit("env.yml", &editor);

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for BAD");
    assert_eq!(t.read("env.yml"), PLAIN);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let kept = stderr
        .split("edits kept in ")
        .nth(1)
        .and_then(|rest| rest.split(')').next())
        .expect("kept path in error");
    let kept = std::path::Path::new(kept);
    assert!(std::fs::read_to_string(kept).unwrap().contains("BAD: [1]"));
    std::fs::remove_dir_all(kept.parent().unwrap()).unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn test_edit_temp_file_is_private() {
    let t = Test::with_file("env.yml", PLAIN);
    let editor = script(&t, "editor.sh", "[ \"$(stat -c %a \"$1\")\" = 600 ] || exit 9");

    let output = t.edit("env.yml", &editor);

    assert_success(&output);
}

#[test]
fn test_edit_missing_editor() {
    let t = Test::with_file("env.yml", PLAIN);

    let output = t.edit("env.yml", "kmsenv-no-such-editor");

    assert_failure(&output);
    assert_stderr_contains(&output, "failed to run kmsenv-no-such-editor");
    assert_eq!(t.read("env.yml"), PLAIN);
}
