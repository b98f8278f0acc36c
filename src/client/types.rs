//! Remote entity types as observed through the labeling API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotation::Cuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Cuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: Cuid,
    pub name: String,
    pub project_ids: Vec<Cuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    pub id: Cuid,
    pub dataset_id: Cuid,
    /// URL or inline content of the asset
    pub row_data: String,
}

/// A label stored on the platform. `label` is the raw label payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Cuid,
    pub project_id: Cuid,
    pub data_row_id: Cuid,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordering for label listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelOrder {
    CreatedAtAsc,
    CreatedAtDesc,
}

/// Filter and ordering for label listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelQuery {
    /// `None` applies no filter; `Some(vec![])` matches nothing
    pub datasets: Option<Vec<Cuid>>,
    pub order_by: Option<LabelOrder>,
}

impl LabelQuery {
    /// Every label in the project, unordered
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_datasets(datasets: impl IntoIterator<Item = Cuid>) -> Self {
        Self {
            datasets: Some(datasets.into_iter().collect()),
            order_by: None,
        }
    }

    pub fn ordered(mut self, order: LabelOrder) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Returns whether a label on a data row in `dataset_id` passes the filter
    pub fn matches_dataset(&self, dataset_id: &Cuid) -> bool {
        match &self.datasets {
            None => true,
            Some(datasets) => datasets.contains(dataset_id),
        }
    }
}
