//! Export document parsing
//!
//! An export document is a JSON array of records. Every record carries a
//! `"Label"` key with the label payload; all other keys are kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::annotation::LabelRecord;

use super::errors::{ClientError, ClientResult};

/// One exported label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Label")]
    pub label: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportRecord {
    /// Label payload as a string, if it was exported as one
    pub fn label_str(&self) -> Option<&str> {
        self.label.as_str()
    }

    /// Exported label id, if present
    pub fn id(&self) -> Option<&str> {
        self.extra.get("ID").and_then(Value::as_str)
    }

    /// Parses a structured label payload into a [`LabelRecord`].
    ///
    /// Feature schemas inside the payload are validated as they are parsed.
    pub fn to_label_record(&self) -> ClientResult<LabelRecord> {
        serde_json::from_value(self.label.clone())
            .map_err(|e| ClientError::InvalidExport(format!("Label payload: {}", e)))
    }
}

/// Parses an export document
pub fn parse_export(document: &str) -> ClientResult<Vec<ExportRecord>> {
    serde_json::from_str(document).map_err(|e| ClientError::InvalidExport(e.to_string()))
}
