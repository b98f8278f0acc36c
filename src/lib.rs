//! labelkit - typed client SDK for a hosted data-labeling platform
//!
//! - `annotation`: feature schemas, cuids and the label records embedding them
//! - `ontology`: ontology model and schema id resolution by name
//! - `client`: remote labeling API contract, in-memory backend, polling
//! - `observability`: structured JSON event logging
//! - `cli`: the `labelkit` command-line tool

pub mod annotation;
pub mod cli;
pub mod client;
pub mod observability;
pub mod ontology;
