//! Schema id assignment
//!
//! Walks feature-schema-bearing records and fills in `schema_id` from an
//! [`OntologyLookup`] wherever it is still unknown.
//!
//! - Schema ids already present are never touched
//! - Names missing from the lookup are left unresolved and reported
//! - Running twice with the same lookup changes nothing the second time

use serde::Serialize;

use crate::annotation::{
    Annotation, ClassificationAnnotation, Cuid, FeatureSchema, LabelCollection, LabelRecord,
};
use crate::observability::{log_event_with_fields, Event};

use super::lookup::OntologyLookup;

/// Outcome of a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Schema ids filled in by this pass
    pub resolved: usize,
    /// Feature schemas that already had a schema id
    pub already_set: usize,
    /// Names with no lookup entry, in visit order
    pub unresolved: Vec<String>,
}

impl ResolutionReport {
    /// Returns true when every visited feature schema now has an id
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    fn record(&mut self, feature: &mut FeatureSchema, found: Option<&Cuid>) {
        if feature.is_resolved() {
            self.already_set += 1;
            return;
        }
        match found {
            Some(id) => {
                feature.fill_schema_id(id);
                self.resolved += 1;
            }
            None => {
                let name = feature.name().unwrap_or_default().to_string();
                log_event_with_fields(Event::SchemaNameUnresolved, &[("name", &name)]);
                self.unresolved.push(name);
            }
        }
    }
}

/// Records whose feature schemas can be resolved against an ontology
pub trait AssignSchemaIds {
    /// Fills in missing schema ids, accumulating into `report`.
    fn assign_schema_ids(&mut self, lookup: &OntologyLookup, report: &mut ResolutionReport);
}

impl AssignSchemaIds for ClassificationAnnotation {
    fn assign_schema_ids(&mut self, lookup: &OntologyLookup, report: &mut ResolutionReport) {
        let found = self.feature.name().and_then(|name| lookup.feature(name));
        report.record(&mut self.feature, found);

        // options are scoped by the classification's name
        let classification = self.feature.name().map(str::to_string);
        for answer in &mut self.answers {
            let found = match (&classification, answer.feature.name()) {
                (Some(parent), Some(value)) => lookup.option(parent, value),
                _ => None,
            };
            report.record(&mut answer.feature, found);

            for nested in &mut answer.classifications {
                nested.assign_schema_ids(lookup, report);
            }
        }
    }
}

impl AssignSchemaIds for Annotation {
    fn assign_schema_ids(&mut self, lookup: &OntologyLookup, report: &mut ResolutionReport) {
        let found = self.feature.name().and_then(|name| lookup.feature(name));
        report.record(&mut self.feature, found);

        for classification in &mut self.classifications {
            classification.assign_schema_ids(lookup, report);
        }
    }
}

impl AssignSchemaIds for LabelRecord {
    fn assign_schema_ids(&mut self, lookup: &OntologyLookup, report: &mut ResolutionReport) {
        for annotation in &mut self.annotations {
            annotation.assign_schema_ids(lookup, report);
        }
    }
}

impl AssignSchemaIds for LabelCollection {
    fn assign_schema_ids(&mut self, lookup: &OntologyLookup, report: &mut ResolutionReport) {
        for label in self.labels_mut() {
            label.assign_schema_ids(lookup, report);
        }
    }
}

/// Resolves schema ids across a batch of records in place.
pub fn assign_schema_ids<R: AssignSchemaIds>(
    records: &mut [R],
    lookup: &OntologyLookup,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    for record in records.iter_mut() {
        record.assign_schema_ids(lookup, &mut report);
    }

    let resolved = report.resolved.to_string();
    let already_set = report.already_set.to_string();
    let unresolved = report.unresolved.len().to_string();
    log_event_with_fields(
        Event::SchemaIdsAssigned,
        &[
            ("already_set", &already_set),
            ("resolved", &resolved),
            ("unresolved", &unresolved),
        ],
    );

    report
}
