//! Label records that embed feature schemas
//!
//! Geometry is not modelled; an annotation is identified by its feature
//! schema plus any nested classifications.

use serde::{Deserialize, Serialize};

use super::feature::FeatureSchema;

/// A selected classification option, with any classifications nested under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationAnswer {
    pub feature: FeatureSchema,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ClassificationAnnotation>,
}

impl ClassificationAnswer {
    pub fn new(feature: FeatureSchema) -> Self {
        Self {
            feature,
            classifications: Vec::new(),
        }
    }

    /// Adds a classification nested under this option
    pub fn with_classification(mut self, classification: ClassificationAnnotation) -> Self {
        self.classifications.push(classification);
        self
    }
}

/// A classification with its selected answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationAnnotation {
    pub feature: FeatureSchema,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<ClassificationAnswer>,
}

impl ClassificationAnnotation {
    pub fn new(feature: FeatureSchema) -> Self {
        Self {
            feature,
            answers: Vec::new(),
        }
    }

    /// Adds a selected answer
    pub fn with_answer(mut self, answer: FeatureSchema) -> Self {
        self.answers.push(ClassificationAnswer::new(answer));
        self
    }

    /// Adds a selected answer that carries nested classifications
    pub fn with_nested_answer(mut self, answer: ClassificationAnswer) -> Self {
        self.answers.push(answer);
        self
    }

    fn collect_feature_schemas<'a>(&'a self, out: &mut Vec<&'a FeatureSchema>) {
        out.push(&self.feature);
        for answer in &self.answers {
            out.push(&answer.feature);
            for nested in &answer.classifications {
                nested.collect_feature_schemas(out);
            }
        }
    }
}

/// A top-level object annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub feature: FeatureSchema,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ClassificationAnnotation>,
}

impl Annotation {
    pub fn new(feature: FeatureSchema) -> Self {
        Self {
            feature,
            classifications: Vec::new(),
        }
    }

    /// Adds a nested classification
    pub fn with_classification(mut self, classification: ClassificationAnnotation) -> Self {
        self.classifications.push(classification);
        self
    }

    /// Visits every feature schema in this annotation, outermost first.
    pub fn feature_schemas(&self) -> Vec<&FeatureSchema> {
        let mut out = vec![&self.feature];
        for classification in &self.classifications {
            classification.collect_feature_schemas(&mut out);
        }
        out
    }
}

/// All annotations made on a single data row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_row_id: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl LabelRecord {
    pub fn new(data_row_id: impl Into<String>) -> Self {
        Self {
            data_row_id: Some(data_row_id.into()),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Returns true when every embedded feature schema has a schema id
    pub fn is_fully_resolved(&self) -> bool {
        self.annotations
            .iter()
            .flat_map(|a| a.feature_schemas())
            .all(FeatureSchema::is_resolved)
    }
}

/// An owned batch of label records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCollection {
    labels: Vec<LabelRecord>,
}

impl LabelCollection {
    pub fn new(labels: Vec<LabelRecord>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[LabelRecord] {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut [LabelRecord] {
        &mut self.labels
    }

    pub fn push(&mut self, label: LabelRecord) {
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_inner(self) -> Vec<LabelRecord> {
        self.labels
    }
}
