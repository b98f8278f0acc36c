//! Remote labeling API client
//!
//! [`LabelingBackend`] is the contract of the hosted platform.
//! [`LabelingClient`] layers the SDK behaviour on top of any backend:
//! logging, polling listings until they catch up with writes, export
//! download and parsing, and schema id resolution against a project's
//! ontology.
//!
//! # Usage
//!
//! ```ignore
//! use labelkit::client::{InMemoryLabelingBackend, LabelQuery, LabelingClient, RetryPolicy};
//!
//! let client = LabelingClient::new(InMemoryLabelingBackend::new(), RetryPolicy::default());
//! let label = client.create_label(&project.id, &row.id, "cat")?;
//! let listed = client.wait_for_label_ids(&project.id, &LabelQuery::all(), &[label.id]).await?;
//! ```

mod backend;
mod config;
mod errors;
mod export;
mod memory;
mod poll;
mod types;

pub use backend::LabelingBackend;
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use export::{parse_export, ExportRecord};
pub use memory::InMemoryLabelingBackend;
pub use poll::{poll_until, RetryPolicy};
pub use types::{DataRow, Dataset, Label, LabelOrder, LabelQuery, Project};

use std::collections::HashSet;

use crate::annotation::{Cuid, LabelRecord};
use crate::observability::{log_event_with_fields, Event};
use crate::ontology::{assign_schema_ids, OntologyLookup, ResolutionReport};

/// SDK client over a labeling backend
#[derive(Debug)]
pub struct LabelingClient<B: LabelingBackend> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: LabelingBackend> LabelingClient<B> {
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn from_config(backend: B, config: &ClientConfig) -> Self {
        Self::new(backend, config.retry_policy())
    }

    /// Direct access to the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn create_label(
        &self,
        project_id: &Cuid,
        data_row_id: &Cuid,
        label: &str,
    ) -> ClientResult<Label> {
        let created = self.backend.create_label(project_id, data_row_id, label)?;
        log_event_with_fields(
            Event::LabelCreated,
            &[
                ("data_row_id", data_row_id.as_str()),
                ("label_id", created.id.as_str()),
                ("project_id", project_id.as_str()),
            ],
        );
        Ok(created)
    }

    pub fn update_label(&self, label_id: &Cuid, label: &str) -> ClientResult<Label> {
        let updated = self.backend.update_label(label_id, label)?;
        log_event_with_fields(Event::LabelUpdated, &[("label_id", label_id.as_str())]);
        Ok(updated)
    }

    pub fn delete_label(&self, label_id: &Cuid) -> ClientResult<()> {
        self.backend.delete_label(label_id)?;
        log_event_with_fields(Event::LabelDeleted, &[("label_id", label_id.as_str())]);
        Ok(())
    }

    pub fn bulk_delete_labels(&self, label_ids: &[Cuid]) -> ClientResult<usize> {
        let deleted = self.backend.bulk_delete_labels(label_ids)?;
        let requested = label_ids.len().to_string();
        let deleted_str = deleted.to_string();
        log_event_with_fields(
            Event::LabelsBulkDeleted,
            &[("deleted", &deleted_str), ("requested", &requested)],
        );
        Ok(deleted)
    }

    /// Polls the project's label listing until `predicate` accepts it.
    pub async fn wait_for_labels<P>(
        &self,
        project_id: &Cuid,
        query: &LabelQuery,
        predicate: P,
    ) -> ClientResult<Vec<Label>>
    where
        P: Fn(&[Label]) -> bool,
    {
        poll_until(&self.policy, || {
            let listed = self.backend.labels(project_id, query);
            let accepted = listed.map(|labels| predicate(&labels).then_some(labels));
            async move { accepted }
        })
        .await
    }

    /// Polls until the listing holds exactly the labels in `expected`.
    pub async fn wait_for_label_ids(
        &self,
        project_id: &Cuid,
        query: &LabelQuery,
        expected: &[Cuid],
    ) -> ClientResult<Vec<Label>> {
        let expected: HashSet<&Cuid> = expected.iter().collect();
        self.wait_for_labels(project_id, query, |labels| {
            labels.len() == expected.len() && labels.iter().all(|l| expected.contains(&l.id))
        })
        .await
    }

    /// Exports the project's labels, downloads the document and parses it.
    ///
    /// Returns an empty list when the platform has no export ready.
    pub fn export_records(&self, project_id: &Cuid) -> ClientResult<Vec<ExportRecord>> {
        log_event_with_fields(Event::ExportRequested, &[("project_id", project_id.as_str())]);
        match self.backend.export_labels(project_id)? {
            Some(url) => parse_export(&self.backend.fetch_export(&url)?),
            None => Ok(Vec::new()),
        }
    }

    /// Builds a name lookup from the project's registered ontology.
    pub fn ontology_lookup(&self, project_id: &Cuid) -> ClientResult<OntologyLookup> {
        let ontology = self
            .backend
            .project_ontology(project_id)?
            .ok_or_else(|| ClientError::ProjectNotSetUp(project_id.to_string()))?;
        Ok(OntologyLookup::from_ontology(&ontology))
    }

    /// Fills in missing schema ids on `records` from the project's ontology.
    pub fn assign_schema_ids(
        &self,
        project_id: &Cuid,
        records: &mut [LabelRecord],
    ) -> ClientResult<ResolutionReport> {
        let lookup = self.ontology_lookup(project_id)?;
        Ok(assign_schema_ids(records, &lookup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, FeatureSchema};
    use crate::ontology::{Ontology, Tool};
    use std::time::Duration;

    fn client(delay_ms: u64) -> LabelingClient<InMemoryLabelingBackend> {
        LabelingClient::new(
            InMemoryLabelingBackend::with_visibility_delay(Duration::from_millis(delay_ms)),
            RetryPolicy {
                initial_delay: Duration::from_millis(5),
                max_delay: Duration::from_millis(40),
                max_attempts: 20,
                jitter: false,
            },
        )
    }

    fn fixture(client: &LabelingClient<InMemoryLabelingBackend>) -> (Project, DataRow) {
        let backend = client.backend();
        let project = backend.create_project("project").unwrap();
        let dataset = backend.create_dataset("dataset", &[project.id.clone()]).unwrap();
        let row = backend.create_data_row(&dataset.id, "row").unwrap();
        (project, row)
    }

    #[tokio::test]
    async fn test_wait_for_created_label() {
        let client = client(30);
        let (project, row) = fixture(&client);

        let label = client.create_label(&project.id, &row.id, "l1").unwrap();
        let listed = client
            .wait_for_label_ids(&project.id, &LabelQuery::all(), &[label.id.clone()])
            .await
            .unwrap();
        assert_eq!(listed, vec![label]);
    }

    #[tokio::test]
    async fn test_wait_times_out_when_never_satisfied() {
        let client = LabelingClient::new(
            InMemoryLabelingBackend::new(),
            RetryPolicy {
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
                max_attempts: 3,
                jitter: false,
            },
        );
        let (project, _) = fixture(&client);

        let err = client
            .wait_for_labels(&project.id, &LabelQuery::all(), |labels| !labels.is_empty())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::PollTimeout { attempts: 3 }));
    }

    #[test]
    fn test_assign_schema_ids_from_project_ontology() {
        let client = client(0);
        let (project, _) = fixture(&client);
        let registered = client
            .backend()
            .setup_project(
                &project.id,
                Ontology {
                    tools: vec![Tool::new("cat", None)],
                    classifications: vec![],
                },
            )
            .unwrap();

        let mut records =
            vec![LabelRecord::new("row").with_annotation(Annotation::new(FeatureSchema::named("cat")))];
        let report = client.assign_schema_ids(&project.id, &mut records).unwrap();

        assert_eq!(report.resolved, 1);
        assert_eq!(
            records[0].annotations[0].feature.schema_id(),
            registered.tools[0].feature_schema_id.as_ref()
        );
    }

    #[test]
    fn test_lookup_requires_setup() {
        let client = client(0);
        let (project, _) = fixture(&client);
        let err = client.ontology_lookup(&project.id).unwrap_err();
        assert!(matches!(err, ClientError::ProjectNotSetUp(_)));
    }

    #[test]
    fn test_export_records() {
        let client = client(0);
        let (project, row) = fixture(&client);
        client
            .backend()
            .setup_project(&project.id, Ontology::empty())
            .unwrap();
        client.create_label(&project.id, &row.id, "export_label").unwrap();

        let records = client.export_records(&project.id).unwrap();
        let labels: Vec<_> = records.iter().filter_map(ExportRecord::label_str).collect();
        assert_eq!(labels, vec!["export_label"]);
    }
}
