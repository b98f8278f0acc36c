//! # Labeling Backend
//!
//! Contract of the remote labeling API. Implementations talk to the hosted
//! platform; [`super::InMemoryLabelingBackend`] simulates it for tests.
//!
//! Listing operations are eventually consistent: a created label may be
//! missing from `labels` and `data_row_labels` for a while, and a deleted
//! label may still be listed. Direct reads by id are immediate.

use crate::annotation::Cuid;
use crate::ontology::Ontology;

use super::errors::ClientResult;
use super::types::{DataRow, Dataset, Label, LabelQuery, Project};

/// Trait for remote labeling API operations
pub trait LabelingBackend: Send + Sync {
    // Projects

    fn create_project(&self, name: &str) -> ClientResult<Project>;

    /// Attach an ontology to a project. The platform assigns feature schema
    /// ids to entries that lack one and returns the registered ontology.
    fn setup_project(&self, project_id: &Cuid, ontology: Ontology) -> ClientResult<Ontology>;

    /// The registered ontology, or `None` if the project was never set up
    fn project_ontology(&self, project_id: &Cuid) -> ClientResult<Option<Ontology>>;

    fn delete_project(&self, project_id: &Cuid) -> ClientResult<()>;

    // Datasets and data rows

    fn create_dataset(&self, name: &str, project_ids: &[Cuid]) -> ClientResult<Dataset>;

    fn delete_dataset(&self, dataset_id: &Cuid) -> ClientResult<()>;

    fn create_data_row(&self, dataset_id: &Cuid, row_data: &str) -> ClientResult<DataRow>;

    // Labels

    fn create_label(&self, project_id: &Cuid, data_row_id: &Cuid, label: &str)
        -> ClientResult<Label>;

    fn get_label(&self, label_id: &Cuid) -> ClientResult<Label>;

    /// Replace the label payload, returning the updated label
    fn update_label(&self, label_id: &Cuid, label: &str) -> ClientResult<Label>;

    fn delete_label(&self, label_id: &Cuid) -> ClientResult<()>;

    /// Delete many labels at once. Unknown ids are ignored; returns how many
    /// labels were deleted.
    fn bulk_delete_labels(&self, label_ids: &[Cuid]) -> ClientResult<usize>;

    /// Labels of a project, filtered and ordered per `query`
    fn labels(&self, project_id: &Cuid, query: &LabelQuery) -> ClientResult<Vec<Label>>;

    fn data_row_labels(&self, data_row_id: &Cuid) -> ClientResult<Vec<Label>>;

    // Export

    /// Start an export and return the URL of the export document, or `None`
    /// if the export is not ready yet.
    fn export_labels(&self, project_id: &Cuid) -> ClientResult<Option<String>>;

    /// Download an export document by URL
    fn fetch_export(&self, url: &str) -> ClientResult<String>;
}
