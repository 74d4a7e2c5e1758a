// CLI integration tests for dump, encode, and result flows.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_modjson");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn run_with_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    // The CLI may reject arguments before reading stdin; a broken pipe is fine then.
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(input.as_bytes());
    }
    child.wait_with_output().expect("output")
}

#[test]
fn dump_is_sorted_and_indented() {
    let out = run_with_stdin(&["dump"], r#"{"b": 1, "a": {"d": [], "c": true}}"#);
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).expect("utf8");
    assert_eq!(
        text,
        "{\n    \"a\": {\n        \"c\": true,\n        \"d\": []\n    },\n    \"b\": 1\n}\n"
    );
}

#[test]
fn dump_reads_file_argument() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("doc.json");
    std::fs::write(&path, r#"{"z": 0, "y": 1}"#).expect("write");

    let out = cmd()
        .args(["dump", path.to_str().unwrap()])
        .output()
        .expect("dump");
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).expect("utf8");
    assert!(text.find("\"y\"").unwrap() < text.find("\"z\"").unwrap());
}

#[test]
fn encode_with_module_direction_is_compact() {
    let out = run_with_stdin(
        &[
            "encode",
            "--module",
            "ping",
            "--direction",
            "controller-to-module",
        ],
        "{\n  \"data\": \"pong\"\n}",
    );
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).expect("utf8");
    assert_eq!(text.trim_end(), r#"{"data":"pong"}"#);
}

#[test]
fn result_merges_flags_and_embedded_diagnostics() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("result.json");
    std::fs::write(
        &path,
        r#"{"changed": false, "warnings": ["from module", "low disk"]}"#,
    )
    .expect("write");

    let out = cmd()
        .args([
            "result",
            "--module",
            "ping",
            "--warn",
            "low disk",
            "--warn",
            "low disk",
            "--deprecate",
            "old flag",
            "--removed-in",
            "3.0",
            path.to_str().unwrap(),
        ])
        .output()
        .expect("result");
    assert!(out.status.success());
    let value = parse_json(std::str::from_utf8(&out.stdout).expect("utf8"));
    assert_eq!(value["changed"], false);
    assert_eq!(value["warnings"], serde_json::json!(["low disk", "from module"]));
    assert_eq!(
        value["deprecations"],
        serde_json::json!([{"msg": "old flag", "version": "3.0"}])
    );
}

#[test]
fn result_notices_go_to_stderr() {
    let out = run_with_stdin(
        &[
            "result",
            "--module",
            "ping",
            "--deprecate",
            "old flag",
            "--removed-on",
            "2031-01-01",
            "--notices",
        ],
        r#"{"changed": true}"#,
    );
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    let notice = stderr
        .lines()
        .map(parse_json)
        .find(|value| value.get("notice").is_some())
        .expect("notice line");
    assert_eq!(notice["notice"]["kind"], "deprecation");
    assert_eq!(notice["notice"]["details"]["date"], "2031-01-01");
    let value = parse_json(std::str::from_utf8(&out.stdout).expect("utf8"));
    assert_eq!(value["deprecations"][0]["date"], "2031-01-01");
}

#[test]
fn malformed_input_exit_code() {
    let out = run_with_stdin(&["dump"], "{\"a\": }");
    assert_eq!(out.status.code().unwrap(), 3);
    let err = parse_json(String::from_utf8_lossy(&out.stderr).trim());
    assert_eq!(err["error"]["kind"], "Parse");
    assert_eq!(err["error"]["line"], 1);
}

#[test]
fn usage_exit_code() {
    let bad_date = run_with_stdin(
        &["result", "--module", "ping", "--removed-on", "tomorrow"],
        "{}",
    );
    assert_eq!(bad_date.status.code().unwrap(), 2);

    let not_object = run_with_stdin(&["result", "--module", "ping"], "[1, 2]");
    assert_eq!(not_object.status.code().unwrap(), 2);
}

#[test]
fn missing_file_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("missing.json");
    let out = cmd()
        .args(["dump", missing.to_str().unwrap()])
        .output()
        .expect("dump");
    assert_eq!(out.status.code().unwrap(), 5);
}
