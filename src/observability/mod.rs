//! Observability for labelkit
//!
//! Structured one-line JSON logs of typed SDK events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Value types never log; only operations over them do
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use labelkit::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LabelCreated, &[("label_id", id.as_str())]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
