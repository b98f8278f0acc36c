//! CLI command implementations
//!
//! Commands work on local files only; nothing here talks to the platform.

use std::path::Path;

use serde_json::{json, Value};

use crate::annotation::{FeatureSchema, LabelCollection};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::ontology::{assign_schema_ids, Ontology, OntologyLookup};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.quiet {
        Logger::set_min_severity(Severity::Error);
    }
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    let result = match command {
        Command::Validate { input } => validate(&input),
        Command::Resolve { labels, ontology } => resolve(&labels, &ontology),
    };

    if let Err(ref e) = result {
        write_error(e.code_str(), e.message(), e.data())?;
    }
    result
}

/// `validate` command
///
/// Writes the report in an ok envelope when every item is valid, otherwise
/// returns it inside the `ValidationFailed` error.
pub fn validate(input: &Path) -> CliResult<()> {
    let values: Vec<Value> = read_json_file(input)?;
    let (report, invalid) = validate_features(&values);

    if invalid > 0 {
        return Err(CliError::validation_failed(invalid).with_data(report));
    }
    write_response(report)
}

/// `resolve` command
pub fn resolve(labels: &Path, ontology: &Path) -> CliResult<()> {
    let collection: LabelCollection = read_json_file(labels)?;
    let ontology: Ontology = read_json_file(ontology)?;
    write_response(resolve_labels(collection, &ontology)?)
}

/// Validates each value as a feature schema. Returns the per-item report and
/// the number of invalid items.
pub fn validate_features(values: &[Value]) -> (Value, usize) {
    let mut results = Vec::with_capacity(values.len());
    let mut invalid = 0;

    for (index, value) in values.iter().enumerate() {
        match FeatureSchema::from_value(value) {
            Ok(feature) => results.push(json!({
                "index": index,
                "valid": true,
                "feature": feature,
            })),
            Err(e) => {
                invalid += 1;
                let index_str = index.to_string();
                log_event_with_fields(
                    Event::FeatureSchemaRejected,
                    &[("code", e.kind().code()), ("index", &index_str)],
                );
                results.push(json!({
                    "index": index,
                    "valid": false,
                    "code": e.kind().code(),
                    "field": e.field(),
                    "message": e.message(),
                }));
            }
        }
    }

    let report = json!({
        "valid": values.len() - invalid,
        "invalid": invalid,
        "results": results,
    });
    (report, invalid)
}

/// Assigns schema ids from `ontology` and returns the resolved labels with
/// the resolution report.
pub fn resolve_labels(mut collection: LabelCollection, ontology: &Ontology) -> CliResult<Value> {
    let lookup = OntologyLookup::from_ontology(ontology);
    let report = assign_schema_ids(collection.labels_mut(), &lookup);

    Ok(json!({
        "labels": serde_json::to_value(&collection)?,
        "report": serde_json::to_value(&report)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = "ckqzx3m8h0001abcdefghijkl";

    #[test]
    fn test_validate_features_report() {
        let values = vec![
            json!({ "name": "cat" }),
            json!({ "schemaId": VALID }),
            json!({}),
            json!({ "name": null, "schemaId": null }),
            json!({ "name": "cat", "schemaId": "short" }),
            json!("cat"),
            json!({ "name": 5 }),
        ];

        let (report, invalid) = validate_features(&values);
        assert_eq!(invalid, 5);
        assert_eq!(report["valid"], 2);

        let results = report["results"].as_array().unwrap();
        assert_eq!(results[0]["feature"], json!({ "name": "cat" }));
        assert_eq!(results[2]["code"], "LABELKIT_MISSING_IDENTITY");
        assert_eq!(results[3]["code"], "LABELKIT_MISSING_IDENTITY");
        assert_eq!(results[4]["code"], "LABELKIT_INVALID_FORMAT");
        assert_eq!(results[4]["field"], "schema_id");
        assert_eq!(results[5]["field"], "$record");
        assert_eq!(results[6]["field"], "name");
    }

    #[test]
    fn test_resolve_labels() {
        let collection: LabelCollection = serde_json::from_value(json!([{
            "dataRowId": "row-1",
            "annotations": [
                { "feature": { "name": "cat" } },
                { "feature": { "name": "dog" } }
            ]
        }]))
        .unwrap();
        let ontology: Ontology = serde_json::from_value(json!({
            "tools": [{ "name": "cat", "featureSchemaId": VALID }],
            "classifications": []
        }))
        .unwrap();

        let output = resolve_labels(collection, &ontology).unwrap();
        assert_eq!(
            output["labels"][0]["annotations"][0]["feature"]["schemaId"],
            VALID
        );
        assert!(output["labels"][0]["annotations"][1]["feature"]
            .get("schemaId")
            .is_none());
        assert_eq!(output["report"]["resolved"], 1);
        assert_eq!(output["report"]["unresolved"], json!(["dog"]));
    }

    #[test]
    fn test_validate_command_fails_on_invalid_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.json");
        fs::write(&path, r#"[{"name": "cat"}, {}]"#).unwrap();

        let err = validate(&path).unwrap_err();
        assert_eq!(err.code_str(), "LABELKIT_CLI_VALIDATION_FAILED");
        let report = err.data().unwrap();
        assert_eq!(report["valid"], 1);
        assert_eq!(report["invalid"], 1);
        assert_eq!(report["results"][1]["code"], "LABELKIT_MISSING_IDENTITY");
    }

    #[test]
    fn test_validate_command_ok() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.json");
        fs::write(&path, r#"[{"name": "cat"}]"#).unwrap();

        assert!(validate(&path).is_ok());
    }

    #[test]
    fn test_resolve_rejects_labels_without_identity() {
        let dir = TempDir::new().unwrap();
        let labels = dir.path().join("labels.json");
        let ontology = dir.path().join("ontology.json");
        fs::write(&labels, r#"[{"annotations": [{"feature": {}}]}]"#).unwrap();
        fs::write(&ontology, r#"{"tools": [], "classifications": []}"#).unwrap();

        let err = resolve(&labels, &ontology).unwrap_err();
        assert_eq!(err.code_str(), "LABELKIT_CLI_INPUT_ERROR");
        assert!(err.message().contains("LABELKIT_MISSING_IDENTITY"));
    }
}
