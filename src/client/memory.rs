//! # In-Memory Labeling Backend
//!
//! Simulates the remote labeling API for tests, including its eventually
//! consistent listings: with a visibility delay configured, new labels only
//! show up in listings once the delay has passed, and deleted labels keep
//! showing up until it has passed.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::annotation::Cuid;
use crate::ontology::{Classification, Ontology};

use super::backend::LabelingBackend;
use super::config::ClientConfig;
use super::errors::{ClientError, ClientResult};
use super::types::{DataRow, Dataset, Label, LabelOrder, LabelQuery, Project};

#[derive(Debug)]
struct StoredProject {
    ontology: Option<Ontology>,
}

#[derive(Debug)]
struct StoredLabel {
    label: Label,
    dataset_id: Cuid,
    seq: u64,
    listed_from: Instant,
    listed_until: Option<Instant>,
    deleted: bool,
}

impl StoredLabel {
    fn is_listed(&self, now: Instant) -> bool {
        now >= self.listed_from && self.listed_until.map_or(true, |until| now < until)
    }
}

#[derive(Debug, Default)]
struct State {
    projects: HashMap<Cuid, StoredProject>,
    datasets: HashMap<Cuid, Dataset>,
    data_rows: HashMap<Cuid, DataRow>,
    labels: HashMap<Cuid, StoredLabel>,
    exports: HashMap<String, String>,
    next_seq: u64,
}

impl State {
    fn live_label_mut(&mut self, label_id: &Cuid) -> ClientResult<&mut StoredLabel> {
        match self.labels.get_mut(label_id) {
            Some(stored) if !stored.deleted => Ok(stored),
            _ => Err(ClientError::not_found("Label", label_id)),
        }
    }

    fn mark_deleted(&mut self, label_id: &Cuid, hidden_at: Instant) -> bool {
        match self.labels.get_mut(label_id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                stored.listed_until = Some(hidden_at);
                true
            }
            _ => false,
        }
    }

    fn listed_labels(
        &self,
        now: Instant,
        filter: impl Fn(&StoredLabel) -> bool,
    ) -> Vec<&StoredLabel> {
        self.labels
            .values()
            .filter(|stored| stored.is_listed(now) && filter(stored))
            .collect()
    }
}

/// In-memory labeling backend for testing
#[derive(Debug, Default)]
pub struct InMemoryLabelingBackend {
    state: RwLock<State>,
    visibility_delay: Duration,
}

impl InMemoryLabelingBackend {
    /// A backend whose listings are immediately consistent
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose listings lag writes by `delay`
    pub fn with_visibility_delay(delay: Duration) -> Self {
        Self {
            state: RwLock::new(State::default()),
            visibility_delay: delay,
        }
    }

    /// A backend using the configured visibility delay
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_visibility_delay(config.visibility_delay())
    }

    pub fn visibility_delay(&self) -> Duration {
        self.visibility_delay
    }

    fn read(&self) -> ClientResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| ClientError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> ClientResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| ClientError::Internal("Lock poisoned".to_string()))
    }

    fn visible_after_delay(&self) -> Instant {
        Instant::now() + self.visibility_delay
    }
}

/// Assigns schema ids to every ontology entry that lacks one
fn register_ontology(mut ontology: Ontology) -> Ontology {
    fn register_classification(classification: &mut Classification) {
        classification
            .feature_schema_id
            .get_or_insert_with(Cuid::generate);
        for option in &mut classification.options {
            option.feature_schema_id.get_or_insert_with(Cuid::generate);
            for nested in &mut option.options {
                register_classification(nested);
            }
        }
    }

    for tool in &mut ontology.tools {
        tool.feature_schema_id.get_or_insert_with(Cuid::generate);
        for classification in &mut tool.classifications {
            register_classification(classification);
        }
    }
    for classification in &mut ontology.classifications {
        register_classification(classification);
    }
    ontology
}

fn sort_labels(labels: &mut [&StoredLabel], order: Option<LabelOrder>) {
    match order {
        Some(LabelOrder::CreatedAtAsc) => {
            labels.sort_by_key(|s| (s.label.created_at, s.seq));
        }
        Some(LabelOrder::CreatedAtDesc) => {
            labels.sort_by_key(|s| std::cmp::Reverse((s.label.created_at, s.seq)));
        }
        None => labels.sort_by_key(|s| s.seq),
    }
}

impl LabelingBackend for InMemoryLabelingBackend {
    fn create_project(&self, name: &str) -> ClientResult<Project> {
        let project = Project {
            id: Cuid::generate(),
            name: name.to_string(),
        };
        let mut state = self.write()?;
        state.projects.insert(
            project.id.clone(),
            StoredProject { ontology: None },
        );
        Ok(project)
    }

    fn setup_project(&self, project_id: &Cuid, ontology: Ontology) -> ClientResult<Ontology> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| ClientError::not_found("Project", project_id))?;
        let registered = register_ontology(ontology);
        stored.ontology = Some(registered.clone());
        Ok(registered)
    }

    fn project_ontology(&self, project_id: &Cuid) -> ClientResult<Option<Ontology>> {
        let state = self.read()?;
        state
            .projects
            .get(project_id)
            .map(|stored| stored.ontology.clone())
            .ok_or_else(|| ClientError::not_found("Project", project_id))
    }

    fn delete_project(&self, project_id: &Cuid) -> ClientResult<()> {
        let hidden_at = self.visible_after_delay();
        let mut state = self.write()?;
        if state.projects.remove(project_id).is_none() {
            return Err(ClientError::not_found("Project", project_id));
        }

        let label_ids: Vec<Cuid> = state
            .labels
            .values()
            .filter(|stored| &stored.label.project_id == project_id)
            .map(|stored| stored.label.id.clone())
            .collect();
        for id in &label_ids {
            state.mark_deleted(id, hidden_at);
        }
        for dataset in state.datasets.values_mut() {
            dataset.project_ids.retain(|id| id != project_id);
        }
        Ok(())
    }

    fn create_dataset(&self, name: &str, project_ids: &[Cuid]) -> ClientResult<Dataset> {
        let mut state = self.write()?;
        if let Some(missing) = project_ids.iter().find(|id| !state.projects.contains_key(*id)) {
            return Err(ClientError::not_found("Project", missing));
        }
        let dataset = Dataset {
            id: Cuid::generate(),
            name: name.to_string(),
            project_ids: project_ids.to_vec(),
        };
        state.datasets.insert(dataset.id.clone(), dataset.clone());
        Ok(dataset)
    }

    fn delete_dataset(&self, dataset_id: &Cuid) -> ClientResult<()> {
        let hidden_at = self.visible_after_delay();
        let mut state = self.write()?;
        if state.datasets.remove(dataset_id).is_none() {
            return Err(ClientError::not_found("Dataset", dataset_id));
        }

        let row_ids: Vec<Cuid> = state
            .data_rows
            .values()
            .filter(|row| &row.dataset_id == dataset_id)
            .map(|row| row.id.clone())
            .collect();
        let label_ids: Vec<Cuid> = state
            .labels
            .values()
            .filter(|stored| &stored.dataset_id == dataset_id)
            .map(|stored| stored.label.id.clone())
            .collect();
        for id in &label_ids {
            state.mark_deleted(id, hidden_at);
        }
        for id in &row_ids {
            state.data_rows.remove(id);
        }
        Ok(())
    }

    fn create_data_row(&self, dataset_id: &Cuid, row_data: &str) -> ClientResult<DataRow> {
        let mut state = self.write()?;
        if !state.datasets.contains_key(dataset_id) {
            return Err(ClientError::not_found("Dataset", dataset_id));
        }
        let row = DataRow {
            id: Cuid::generate(),
            dataset_id: dataset_id.clone(),
            row_data: row_data.to_string(),
        };
        state.data_rows.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    fn create_label(
        &self,
        project_id: &Cuid,
        data_row_id: &Cuid,
        label: &str,
    ) -> ClientResult<Label> {
        let listed_from = self.visible_after_delay();
        let mut state = self.write()?;
        if !state.projects.contains_key(project_id) {
            return Err(ClientError::not_found("Project", project_id));
        }
        let dataset_id = state
            .data_rows
            .get(data_row_id)
            .map(|row| row.dataset_id.clone())
            .ok_or_else(|| ClientError::not_found("DataRow", data_row_id))?;

        let now = Utc::now();
        let created = Label {
            id: Cuid::generate(),
            project_id: project_id.clone(),
            data_row_id: data_row_id.clone(),
            label: label.to_string(),
            created_at: now,
            updated_at: now,
        };
        let seq = state.next_seq;
        state.next_seq += 1;
        state.labels.insert(
            created.id.clone(),
            StoredLabel {
                label: created.clone(),
                dataset_id,
                seq,
                listed_from,
                listed_until: None,
                deleted: false,
            },
        );
        Ok(created)
    }

    fn get_label(&self, label_id: &Cuid) -> ClientResult<Label> {
        let state = self.read()?;
        match state.labels.get(label_id) {
            Some(stored) if !stored.deleted => Ok(stored.label.clone()),
            _ => Err(ClientError::not_found("Label", label_id)),
        }
    }

    fn update_label(&self, label_id: &Cuid, label: &str) -> ClientResult<Label> {
        let mut state = self.write()?;
        let stored = state.live_label_mut(label_id)?;
        stored.label.label = label.to_string();
        stored.label.updated_at = Utc::now();
        Ok(stored.label.clone())
    }

    fn delete_label(&self, label_id: &Cuid) -> ClientResult<()> {
        let hidden_at = self.visible_after_delay();
        let mut state = self.write()?;
        if state.mark_deleted(label_id, hidden_at) {
            Ok(())
        } else {
            Err(ClientError::not_found("Label", label_id))
        }
    }

    fn bulk_delete_labels(&self, label_ids: &[Cuid]) -> ClientResult<usize> {
        let hidden_at = self.visible_after_delay();
        let mut state = self.write()?;
        Ok(label_ids
            .iter()
            .filter(|id| state.mark_deleted(id, hidden_at))
            .count())
    }

    fn labels(&self, project_id: &Cuid, query: &LabelQuery) -> ClientResult<Vec<Label>> {
        let state = self.read()?;
        if !state.projects.contains_key(project_id) {
            return Err(ClientError::not_found("Project", project_id));
        }

        // filters on the dataset recorded at creation so labels of a deleted
        // dataset stay listed until their listing window closes
        let mut listed = state.listed_labels(Instant::now(), |stored| {
            &stored.label.project_id == project_id && query.matches_dataset(&stored.dataset_id)
        });
        sort_labels(&mut listed, query.order_by);
        Ok(listed.into_iter().map(|s| s.label.clone()).collect())
    }

    fn data_row_labels(&self, data_row_id: &Cuid) -> ClientResult<Vec<Label>> {
        let state = self.read()?;
        if !state.data_rows.contains_key(data_row_id) {
            return Err(ClientError::not_found("DataRow", data_row_id));
        }

        let mut listed =
            state.listed_labels(Instant::now(), |stored| &stored.label.data_row_id == data_row_id);
        sort_labels(&mut listed, None);
        Ok(listed.into_iter().map(|s| s.label.clone()).collect())
    }

    fn export_labels(&self, project_id: &Cuid) -> ClientResult<Option<String>> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get(project_id)
            .ok_or_else(|| ClientError::not_found("Project", project_id))?;
        if stored.ontology.is_none() {
            return Err(ClientError::ProjectNotSetUp(project_id.to_string()));
        }

        let mut listed =
            state.listed_labels(Instant::now(), |stored| &stored.label.project_id == project_id);
        sort_labels(&mut listed, Some(LabelOrder::CreatedAtAsc));

        let records: Vec<Value> = listed
            .iter()
            .map(|stored| {
                let label = &stored.label;
                let dataset_name = state
                    .datasets
                    .get(&stored.dataset_id)
                    .map(|dataset| dataset.name.clone());
                // payloads that are JSON export as JSON, anything else as a string
                let payload = serde_json::from_str::<Value>(&label.label)
                    .unwrap_or_else(|_| Value::String(label.label.clone()));
                json!({
                    "ID": label.id,
                    "DataRow ID": label.data_row_id,
                    "Dataset Name": dataset_name,
                    "Created At": label.created_at.to_rfc3339(),
                    "Label": payload,
                })
            })
            .collect();

        let document = serde_json::to_string(&records)
            .map_err(|e| ClientError::Internal(format!("Failed to encode export: {}", e)))?;
        let url = format!("memory://exports/{}/{}", project_id, Uuid::new_v4());
        state.exports.insert(url.clone(), document);
        Ok(Some(url))
    }

    fn fetch_export(&self, url: &str) -> ClientResult<String> {
        let state = self.read()?;
        state
            .exports
            .get(url)
            .cloned()
            .ok_or_else(|| ClientError::not_found("Export", url))
    }
}
