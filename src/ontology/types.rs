//! Ontology wire model
//!
//! Mirrors the JSON the platform returns for a project's ontology:
//!
//! ```json
//! {
//!   "tools": [{ "name": "cat", "featureSchemaId": "c...", "classifications": [] }],
//!   "classifications": [{
//!     "instructions": "color",
//!     "featureSchemaId": "c...",
//!     "options": [{ "value": "black", "featureSchemaId": "c..." }]
//!   }]
//! }
//! ```
//!
//! Feature schema ids are absent until the platform registers the ontology.

use serde::{Deserialize, Serialize};

use crate::annotation::Cuid;

/// An option of a classification; may carry nested classifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyOption {
    /// Option name
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_schema_id: Option<Cuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Classification>,
}

impl OntologyOption {
    pub fn new(value: impl Into<String>, feature_schema_id: Option<Cuid>) -> Self {
        Self {
            value: value.into(),
            feature_schema_id,
            options: Vec::new(),
        }
    }

    /// Adds a classification asked once this option is selected
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.options.push(classification);
        self
    }
}

/// A classification (question) in the ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Classification name
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_schema_id: Option<Cuid>,
    #[serde(default)]
    pub options: Vec<OntologyOption>,
}

impl Classification {
    pub fn new(instructions: impl Into<String>, feature_schema_id: Option<Cuid>) -> Self {
        Self {
            instructions: instructions.into(),
            feature_schema_id,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: OntologyOption) -> Self {
        self.options.push(option);
        self
    }
}

/// An object tool in the ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_schema_id: Option<Cuid>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

impl Tool {
    pub fn new(name: impl Into<String>, feature_schema_id: Option<Cuid>) -> Self {
        Self {
            name: name.into(),
            feature_schema_id,
            classifications: Vec::new(),
        }
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }
}

/// A project's ontology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ontology {
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

impl Ontology {
    /// An ontology with no tools and no classifications
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.classifications.is_empty()
    }
}
