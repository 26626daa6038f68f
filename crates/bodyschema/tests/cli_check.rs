#![cfg(feature = "cli")]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bodyschema-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("fixture should be writable");
    path
}

fn check(schema: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bodyschema"))
        .arg("--format")
        .arg("json")
        .arg("check")
        .arg("--schema")
        .arg(schema)
        .args(extra)
        .output()
        .expect("check should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn accepted_body_prints_parsed_object() {
    let dir = unique_temp_dir("accept");
    let schema = write(
        &dir,
        "schema.json",
        r#"{
            "name": {"type": "String", "trim": true, "uppercase": true},
            "page": {"type": "Number", "default": 1},
            "tags": {"type": ["String"]}
        }"#,
    );

    let output = check(
        &schema,
        &["--json", r#"{"name": "  docs ", "tags": "a,b", "extra": true}"#],
    );

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"name": "DOCS", "page": 1, "tags": ["a", "b"]})
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rejected_body_exits_60_with_error_object() {
    let dir = unique_temp_dir("reject");
    let schema = write(
        &dir,
        "schema.json",
        r#"{"name": {"type": "String", "required": true}}"#,
    );

    let output = check(&schema, &[]);

    assert_eq!(output.status.code(), Some(60));
    let error = stdout_json(&output);
    assert_eq!(error["param"], "name");
    assert_eq!(error["name"], "required");
    assert_eq!(error["message"], "name is required");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn options_rename_and_hide_fields() {
    let dir = unique_temp_dir("options");
    let schema = write(
        &dir,
        "schema.json",
        r#"{"page": {"type": "Number"}, "secret": {"type": "String"}}"#,
    );
    let options = write(&dir, "options.json", r#"{"page": "p", "secret": false}"#);
    let body = write(&dir, "body.json", r#"{"p": "4", "page": "9", "secret": "x"}"#);

    let output = check(
        &schema,
        &[
            "--options",
            options.to_str().expect("utf-8 path"),
            "--body",
            body.to_str().expect("utf-8 path"),
        ],
    );

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({"p": 4}));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn body_is_read_from_stdin() {
    let dir = unique_temp_dir("stdin");
    let schema = write(&dir, "schema.json", r#"{"count": {"type": "Number", "max": 3}}"#);

    let mut child = Command::new(env!("CARGO_BIN_EXE_bodyschema"))
        .arg("--format")
        .arg("json")
        .arg("check")
        .arg("--schema")
        .arg(&schema)
        .arg("--body")
        .arg("-")
        .arg("--hide-value")
        .arg("--rejection-status")
        .arg("422")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("check should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(br#"{"count": "5"}"#)
        .expect("stdin should accept the body");
    let output = child.wait_with_output().expect("check should finish");

    assert_eq!(output.status.code(), Some(60));
    let error = stdout_json(&output);
    assert_eq!(error["param"], "count");
    assert_eq!(error["message"], "count must be less than or equal to 3");
    assert!(error.get("value").is_none());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pretty_rejection_reports_status() {
    let dir = unique_temp_dir("pretty");
    let schema = write(
        &dir,
        "schema.json",
        r#"{"kind": {"type": "String", "enum": ["a", "b"]}}"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_bodyschema"))
        .arg("--format")
        .arg("pretty")
        .arg("check")
        .arg("--schema")
        .arg(&schema)
        .arg("--json")
        .arg(r#"{"kind": "c"}"#)
        .output()
        .expect("check should run");

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status=400"));
    assert!(stdout.contains("kind must be one of: a, b"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_schema_file_exits_66() {
    let dir = unique_temp_dir("missing");
    let output = check(&dir.join("nope.json"), &[]);
    assert_eq!(output.status.code(), Some(66));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed reading"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_inputs_are_usage_or_data_errors() {
    let dir = unique_temp_dir("malformed");
    let bad_schema = write(&dir, "bad.json", "[1, 2]");
    assert_eq!(check(&bad_schema, &[]).status.code(), Some(64));

    let schema = write(&dir, "schema.json", r#"{"name": "String"}"#);
    assert_eq!(check(&schema, &["--json", "{"]).status.code(), Some(64));
    assert_eq!(
        check(&schema, &["--rejection-status", "200"]).status.code(),
        Some(64)
    );

    let body = write(&dir, "body.json", "not json");
    assert_eq!(
        check(&schema, &["--body", body.to_str().expect("utf-8 path")])
            .status
            .code(),
        Some(60)
    );
    let _ = std::fs::remove_dir_all(&dir);
}
