//! Feature schema identity
//!
//! A feature schema is an ontology entry (a tool, a classification, or an
//! option) referenced by an annotation. The schema id is often unknown when a
//! record is first built, so either a name or a schema id identifies it.
//!
//! Validation is two-phase:
//! 1. Field parsing: `schema_id` must be a [`Cuid`] (`LABELKIT_INVALID_FORMAT`)
//! 2. Record check: at least one of `name`/`schema_id` (`LABELKIT_MISSING_IDENTITY`)
//!
//! Deserialization goes through the same two phases.
//!
//! Use [`crate::ontology::assign_schema_ids`] to fill in schema ids by name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cuid::Cuid;
use super::errors::{ValidationError, ValidationResult};

/// Identity of a feature schema, known by name, by schema id, or both.
///
/// Invariant: `name` and `schema_id` are never both `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureSchema", rename_all = "camelCase")]
pub struct FeatureSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_id: Option<Cuid>,
}

impl FeatureSchema {
    /// Builds a feature schema from raw field values.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if `schema_id` is present but not a cuid. Checked
    ///   first, regardless of `name`.
    /// - `MissingIdentity` if both are `None`.
    pub fn new(name: Option<String>, schema_id: Option<&str>) -> ValidationResult<Self> {
        let schema_id = schema_id
            .map(|id| Cuid::parse_field("schema_id", id))
            .transpose()?;
        Self::from_parts(name, schema_id)
    }

    /// Builds a feature schema from already-parsed fields, running only the
    /// record-level check.
    pub fn from_parts(name: Option<String>, schema_id: Option<Cuid>) -> ValidationResult<Self> {
        if name.is_none() && schema_id.is_none() {
            return Err(ValidationError::missing_identity());
        }
        Ok(Self { name, schema_id })
    }

    /// Parses a JSON value through the same wire form as deserialization,
    /// keeping the failing kind and field instead of a serde message.
    ///
    /// Non-object input and non-string fields fail with `InvalidFormat` on
    /// `$record` and the offending field respectively.
    pub fn from_value(value: &Value) -> ValidationResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ValidationError::invalid_format("$record", "an object", value.to_string())
        })?;

        let keys = [
            ("name", "name"),
            ("schemaId", "schema_id"),
            ("schema_id", "schema_id"),
        ];
        for (key, field) in keys {
            match object.get(key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(ValidationError::invalid_format(
                        field,
                        "a string or null",
                        other.to_string(),
                    ))
                }
            }
        }

        let raw: RawFeatureSchema = serde_json::from_value(value.clone()).map_err(|e| {
            ValidationError::invalid_format("$record", "a feature schema object", e.to_string())
        })?;
        Self::try_from(raw)
    }

    /// A feature schema known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            schema_id: None,
        }
    }

    /// A feature schema known only by schema id
    pub fn with_id(schema_id: Cuid) -> Self {
        Self {
            name: None,
            schema_id: Some(schema_id),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn schema_id(&self) -> Option<&Cuid> {
        self.schema_id.as_ref()
    }

    /// Returns true once a schema id is known
    pub fn is_resolved(&self) -> bool {
        self.schema_id.is_some()
    }

    /// Fills in the schema id if it is still unknown. Returns whether it changed.
    ///
    /// An existing schema id is never overwritten.
    pub(crate) fn fill_schema_id(&mut self, schema_id: &Cuid) -> bool {
        if self.schema_id.is_some() {
            return false;
        }
        self.schema_id = Some(schema_id.clone());
        true
    }
}

/// Unvalidated wire form
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeatureSchema {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "schema_id")]
    schema_id: Option<String>,
}

impl TryFrom<RawFeatureSchema> for FeatureSchema {
    type Error = ValidationError;

    fn try_from(raw: RawFeatureSchema) -> Result<Self, Self::Error> {
        FeatureSchema::new(raw.name, raw.schema_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::ValidationErrorKind;

    const VALID: &str = "ckqzx3m8h0001abcdefghijkl";

    #[test]
    fn test_from_value_matches_deserialization() {
        let inputs = [
            serde_json::json!({ "name": "cat" }),
            serde_json::json!({ "schema_id": VALID }),
            serde_json::json!({ "name": null, "schemaId": null }),
            serde_json::json!({ "schemaId": "short" }),
            serde_json::json!({ "schemaId": "short", "schema_id": VALID }),
        ];
        for input in inputs {
            let direct = FeatureSchema::from_value(&input);
            let via_serde = serde_json::from_value::<FeatureSchema>(input.clone());
            assert_eq!(direct.is_ok(), via_serde.is_ok(), "input {}", input);
            if let (Ok(a), Ok(b)) = (&direct, &via_serde) {
                assert_eq!(a, b);
            }
        }

        // both spellings of the id together are a malformed record
        let err = FeatureSchema::from_value(
            &serde_json::json!({ "schemaId": "short", "schema_id": VALID }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidFormat);
        assert_eq!(err.field(), "$record");
    }

    #[test]
    fn test_from_value_reports_field() {
        let err = FeatureSchema::from_value(&serde_json::json!({ "name": 5 })).unwrap_err();
        assert_eq!(err.field(), "name");

        let err = FeatureSchema::from_value(&serde_json::json!({ "schemaId": "nope" })).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidFormat);
        assert_eq!(err.field(), "schema_id");

        let err = FeatureSchema::from_value(&serde_json::json!({})).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingIdentity);

        let err = FeatureSchema::from_value(&serde_json::json!("cat")).unwrap_err();
        assert_eq!(err.field(), "$record");
    }

    #[test]
    fn test_name_only() {
        let schema = FeatureSchema::new(Some("cat".into()), None).unwrap();
        assert_eq!(schema.name(), Some("cat"));
        assert!(schema.schema_id().is_none());
        assert!(!schema.is_resolved());
    }

    #[test]
    fn test_name_round_trips_unchanged() {
        for name in ["", "cat", "  spaced  ", "ünïcødé 🐈", "a\nb"] {
            let schema = FeatureSchema::new(Some(name.to_string()), None).unwrap();
            assert_eq!(schema.name(), Some(name));
        }
    }

    #[test]
    fn test_schema_id_only() {
        let schema = FeatureSchema::new(None, Some(VALID)).unwrap();
        assert!(schema.name().is_none());
        assert_eq!(schema.schema_id().unwrap().as_str(), VALID);
        assert!(schema.is_resolved());
    }

    #[test]
    fn test_both_set_is_valid() {
        let schema = FeatureSchema::new(Some("cat".into()), Some(VALID)).unwrap();
        assert_eq!(schema.name(), Some("cat"));
        assert_eq!(schema.schema_id().unwrap().as_str(), VALID);
    }

    #[test]
    fn test_neither_set_is_missing_identity() {
        let err = FeatureSchema::new(None, None).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingIdentity);

        let err = FeatureSchema::from_parts(None, None).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingIdentity);
    }

    #[test]
    fn test_malformed_id_is_invalid_format_regardless_of_name() {
        for name in [None, Some("cat".to_string())] {
            let err = FeatureSchema::new(name, Some("ckqzx")).unwrap_err();
            assert_eq!(err.kind(), ValidationErrorKind::InvalidFormat);
            assert_eq!(err.field(), "schema_id");
        }
    }

    #[test]
    fn test_equality_is_structural() {
        let by_name = FeatureSchema::named("cat");
        let by_id = FeatureSchema::with_id(Cuid::parse(VALID).unwrap());
        assert_ne!(by_name, by_id);
        assert_eq!(by_name, FeatureSchema::new(Some("cat".into()), None).unwrap());
    }

    #[test]
    fn test_fill_schema_id_never_overwrites() {
        let first = Cuid::parse(VALID).unwrap();
        let second = Cuid::parse("cbbbbbbbbbbbbbbbbbbbbbbbb").unwrap();

        let mut schema = FeatureSchema::named("cat");
        assert!(schema.fill_schema_id(&first));
        assert!(!schema.fill_schema_id(&second));
        assert_eq!(schema.schema_id(), Some(&first));
    }

    #[test]
    fn test_deserialize_validates() {
        let schema: FeatureSchema = serde_json::from_str(r#"{"name": "cat"}"#).unwrap();
        assert_eq!(schema, FeatureSchema::named("cat"));

        let schema: FeatureSchema =
            serde_json::from_str(&format!(r#"{{"schemaId": "{}"}}"#, VALID)).unwrap();
        assert!(schema.name().is_none());

        let schema: FeatureSchema =
            serde_json::from_str(&format!(r#"{{"schema_id": "{}"}}"#, VALID)).unwrap();
        assert!(schema.is_resolved());
    }

    #[test]
    fn test_deserialize_missing_identity() {
        for input in ["{}", r#"{"name": null, "schemaId": null}"#] {
            let err = serde_json::from_str::<FeatureSchema>(input).unwrap_err();
            assert!(err.to_string().contains("LABELKIT_MISSING_IDENTITY"));
        }
    }

    #[test]
    fn test_deserialize_invalid_format_before_identity_check() {
        let err = serde_json::from_str::<FeatureSchema>(r#"{"schemaId": "short"}"#).unwrap_err();
        assert!(err.to_string().contains("LABELKIT_INVALID_FORMAT"));
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let json = serde_json::to_value(FeatureSchema::named("cat")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "cat" }));

        let json = serde_json::to_value(FeatureSchema::new(Some("cat".into()), Some(VALID)).unwrap())
            .unwrap();
        assert_eq!(json, serde_json::json!({ "name": "cat", "schemaId": VALID }));
    }
}
