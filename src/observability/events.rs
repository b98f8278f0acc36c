//! Observable SDK events
//!
//! Events are explicit and typed. Each event carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in labelkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Client configuration loaded
    ConfigLoaded,

    // Feature schemas
    /// A feature schema failed validation (CLI input)
    FeatureSchemaRejected,
    /// Schema id resolution pass finished
    SchemaIdsAssigned,
    /// A name had no entry in the ontology lookup
    SchemaNameUnresolved,
    /// Ontology lookup built
    OntologyIndexed,

    // Labels
    /// Label created
    LabelCreated,
    /// Label updated
    LabelUpdated,
    /// Label deleted
    LabelDeleted,
    /// Labels removed by bulk delete
    LabelsBulkDeleted,
    /// Label export requested
    ExportRequested,

    // Polling
    /// Condition not yet met, backing off
    PollRetry,
    /// Condition met
    PollSatisfied,
    /// Attempts exhausted
    PollTimeout,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::FeatureSchemaRejected => "FEATURE_SCHEMA_REJECTED",
            Event::SchemaIdsAssigned => "SCHEMA_IDS_ASSIGNED",
            Event::SchemaNameUnresolved => "SCHEMA_NAME_UNRESOLVED",
            Event::OntologyIndexed => "ONTOLOGY_INDEXED",

            Event::LabelCreated => "LABEL_CREATED",
            Event::LabelUpdated => "LABEL_UPDATED",
            Event::LabelDeleted => "LABEL_DELETED",
            Event::LabelsBulkDeleted => "LABELS_BULK_DELETED",
            Event::ExportRequested => "EXPORT_REQUESTED",

            Event::PollRetry => "POLL_RETRY",
            Event::PollSatisfied => "POLL_SATISFIED",
            Event::PollTimeout => "POLL_TIMEOUT",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PollTimeout => Severity::Error,
            Event::FeatureSchemaRejected | Event::SchemaNameUnresolved => Severity::Warn,
            Event::PollRetry => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
