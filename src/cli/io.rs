//! JSON I/O handling for CLI
//!
//! - Input: JSON files named on the command line
//! - Output: single JSON object on stdout, `{"status": "ok", "data": ...}`
//!   or `{"status": "error", "code": ..., "message": ...}` with an optional
//!   `data` payload
//! - Exactly one envelope per invocation

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read and parse a JSON input file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::input_error(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::input_error(format!("Invalid JSON in '{}': {}", path.display(), e)))
}

fn envelope_ok(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn envelope_error(code: &str, message: &str, data: Option<&Value>) -> Value {
    let mut envelope = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let Some(data) = data {
        envelope["data"] = data.clone();
    }
    envelope
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&envelope_ok(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, data: Option<&Value>) -> CliResult<()> {
    write_line(&envelope_error(code, message, data))
}
