//! Name to schema id lookup built from an ontology
//!
//! Feature names (tools and classifications, at any depth) share one
//! namespace. Option names are scoped by the classification they belong to,
//! since options such as "yes"/"no" repeat across classifications.
//!
//! When a name appears twice, the first occurrence wins.

use std::collections::HashMap;

use crate::annotation::Cuid;
use crate::observability::{log_event_with_fields, Event};

use super::types::{Classification, Ontology};

/// Immutable name to schema id mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntologyLookup {
    features: HashMap<String, Cuid>,
    options: HashMap<(String, String), Cuid>,
}

impl OntologyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every registered entry of an ontology.
    ///
    /// Entries without a feature schema id are skipped.
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut lookup = Self::new();

        for tool in &ontology.tools {
            if let Some(id) = &tool.feature_schema_id {
                lookup.insert_feature(tool.name.clone(), id.clone());
            }
            for classification in &tool.classifications {
                lookup.index_classification(classification);
            }
        }
        for classification in &ontology.classifications {
            lookup.index_classification(classification);
        }

        let features = lookup.features.len().to_string();
        let options = lookup.options.len().to_string();
        log_event_with_fields(
            Event::OntologyIndexed,
            &[("features", &features), ("options", &options)],
        );

        lookup
    }

    fn index_classification(&mut self, classification: &Classification) {
        if let Some(id) = &classification.feature_schema_id {
            self.insert_feature(classification.instructions.clone(), id.clone());
        }
        for option in &classification.options {
            if let Some(id) = &option.feature_schema_id {
                self.insert_option(
                    classification.instructions.clone(),
                    option.value.clone(),
                    id.clone(),
                );
            }
            for nested in &option.options {
                self.index_classification(nested);
            }
        }
    }

    /// Adds a feature entry. Returns false if the name was already present.
    pub fn insert_feature(&mut self, name: impl Into<String>, schema_id: Cuid) -> bool {
        let name = name.into();
        if self.features.contains_key(&name) {
            return false;
        }
        self.features.insert(name, schema_id);
        true
    }

    /// Adds an option entry scoped by its classification. Returns false if
    /// the pair was already present.
    pub fn insert_option(
        &mut self,
        classification: impl Into<String>,
        value: impl Into<String>,
        schema_id: Cuid,
    ) -> bool {
        let key = (classification.into(), value.into());
        if self.options.contains_key(&key) {
            return false;
        }
        self.options.insert(key, schema_id);
        true
    }

    /// Schema id of a tool or classification by name
    pub fn feature(&self, name: &str) -> Option<&Cuid> {
        self.features.get(name)
    }

    /// Schema id of an option within the named classification
    pub fn option(&self, classification: &str, value: &str) -> Option<&Cuid> {
        self.options
            .get(&(classification.to_string(), value.to_string()))
    }

    /// Total number of indexed entries
    pub fn len(&self) -> usize {
        self.features.len() + self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.options.is_empty()
    }
}
