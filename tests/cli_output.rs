//! CLI Output Tests
//!
//! Runs the `labelkit` binary and checks its stdout contract:
//! - exactly one JSON envelope per invocation
//! - failed validation reports through the error envelope and exits non-zero
//! - log lines never reach stdout

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn labelkit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_labelkit"))
        .args(args)
        .output()
        .unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

/// Parses stdout, asserting it holds a single JSON line.
fn single_envelope(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout: {}", stdout);
    serde_json::from_str(lines[0]).unwrap()
}

// =============================================================================
// Validate Tests
// =============================================================================

/// Invalid items yield one error envelope carrying the report.
#[test]
fn test_validate_failure_writes_one_envelope() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "features.json", r#"[{"name": "cat"}, {}]"#);

    let output = labelkit(&["validate", "--input", &input]);
    assert_eq!(output.status.code(), Some(1));

    let envelope = single_envelope(&output);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["code"], "LABELKIT_CLI_VALIDATION_FAILED");
    assert_eq!(envelope["data"]["valid"], 1);
    assert_eq!(envelope["data"]["invalid"], 1);
}

/// All-valid input yields one ok envelope and exit status zero.
#[test]
fn test_validate_success_writes_one_envelope() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "features.json",
        r#"[{"name": "cat"}, {"schemaId": "ckqzx3m8h0001abcdefghijkl"}]"#,
    );

    let output = labelkit(&["validate", "--input", &input]);
    assert!(output.status.success());

    let envelope = single_envelope(&output);
    assert_eq!(envelope["status"], "ok");
    assert_eq!(envelope["data"]["valid"], 2);
}

/// A missing input file is an input error envelope.
#[test]
fn test_missing_input_writes_one_envelope() {
    let dir = TempDir::new().unwrap();
    let absent = path_str(&dir.path().join("absent.json"));

    let output = labelkit(&["validate", "--input", &absent]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(single_envelope(&output)["code"], "LABELKIT_CLI_INPUT_ERROR");
}

// =============================================================================
// Resolve Tests
// =============================================================================

/// Resolution logs go to stderr at every severity; stdout is only the envelope.
#[test]
fn test_resolve_logs_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let labels = write_file(
        &dir,
        "labels.json",
        r#"[{"annotations": [{"feature": {"name": "cat"}}, {"feature": {"name": "dog"}}]}]"#,
    );
    let ontology = write_file(
        &dir,
        "ontology.json",
        r#"{"tools": [{"name": "cat", "featureSchemaId": "ckqzx3m8h0001abcdefghijkl"}]}"#,
    );

    let output = labelkit(&["resolve", "--labels", &labels, "--ontology", &ontology]);
    assert!(output.status.success());

    let envelope = single_envelope(&output);
    assert_eq!(envelope["status"], "ok");
    assert_eq!(envelope["data"]["report"]["unresolved"][0], "dog");

    // INFO and WARN lines alike land on stderr
    let stderr = String::from_utf8(output.stderr).unwrap();
    let events: Vec<Value> = stderr
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(events
        .iter()
        .any(|e| e["event"] == "SCHEMA_NAME_UNRESOLVED" && e["severity"] == "WARN"));
    assert!(events
        .iter()
        .any(|e| e["event"] == "SCHEMA_IDS_ASSIGNED" && e["severity"] == "INFO"));
}
