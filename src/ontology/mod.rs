//! Ontology model and schema id resolution
//!
//! An ontology lists the tools, classifications and options a project can
//! label with. Label records refer to these by name until the platform has
//! assigned schema ids; [`assign_schema_ids`] patches the ids in afterwards.

mod assign;
mod lookup;
mod types;

pub use assign::{assign_schema_ids, AssignSchemaIds, ResolutionReport};
pub use lookup::OntologyLookup;
pub use types::{Classification, Ontology, OntologyOption, Tool};
