//! Annotation data models for labelkit
//!
//! # Design Principles
//!
//! - Feature schemas are identified by name, schema id, or both
//! - Field-level parsing runs before record-level checks
//! - Deserialization validates exactly like construction
//! - Models perform no I/O

mod cuid;
mod errors;
mod feature;
mod label;

pub use cuid::{Cuid, CUID_LENGTH};
pub use errors::{ValidationError, ValidationErrorKind, ValidationResult};
pub use feature::FeatureSchema;
pub use label::{
    Annotation, ClassificationAnnotation, ClassificationAnswer, LabelCollection, LabelRecord,
};
