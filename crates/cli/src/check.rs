//! Batch checking of JSON documents against a rule schema.

use std::fmt;
use std::path::Path;

use fieldrules_core::{RecordSchema, ValidationError, Validator, Violation};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{CheckConfig, ReportFormat};
use crate::error::CliError;

/// Result for one record of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// Position of the record in the document; `0` for a single object.
    pub index: usize,
    /// `"{label}: {message}"` of the first failing rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
}

impl RecordOutcome {
    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "record {}: {message}", self.index),
            None => write!(f, "record {}: ok", self.index),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(RecordOutcome::is_valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_valid()).count()
    }
}

/// Every record is valid.
pub const EXIT_VALID: u8 = 0;
/// At least one record is invalid.
pub const EXIT_INVALID: u8 = 1;
/// The configuration, schema or document could not be used.
pub const EXIT_ERROR: u8 = 2;

/// Process exit code for the outcome of a check.
pub fn exit_code(result: &Result<CheckReport, CliError>) -> u8 {
    match result {
        Ok(report) if report.is_valid() => EXIT_VALID,
        Ok(_) => EXIT_INVALID,
        Err(_) => EXIT_ERROR,
    }
}

/// Render `report` for stdout. Text output has one line per record.
pub fn render_report(report: &CheckReport, format: ReportFormat) -> Result<String, CliError> {
    match format {
        ReportFormat::Text => Ok(report
            .outcomes
            .iter()
            .map(|outcome| format!("{outcome}\n"))
            .collect()),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_schema(path: &Path) -> Result<RecordSchema, CliError> {
    RecordSchema::from_json(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_document(path: &Path) -> Result<Value, CliError> {
    serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// The records of a document: the object itself, or every element of an
/// array of objects.
fn records(document: &Value) -> Result<Vec<&Map<String, Value>>, CliError> {
    match document {
        Value::Object(object) => Ok(vec![object]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_object().ok_or_else(|| {
                    CliError::DocumentShape(format!("element {index} is not an object"))
                })
            })
            .collect(),
        _ => Err(CliError::DocumentShape(
            "expected an object or an array of objects".to_string(),
        )),
    }
}

/// Validate every record of `document`.
///
/// Data failures become outcomes; a broken schema aborts the whole batch.
pub fn check_documents(
    validator: &Validator,
    schema: &RecordSchema,
    document: &Value,
) -> Result<CheckReport, CliError> {
    let mut outcomes = Vec::new();

    for (index, object) in records(document)?.into_iter().enumerate() {
        let outcome = match validator.validate(&schema.bind(object)) {
            Ok(()) => RecordOutcome {
                index,
                message: None,
                violation: None,
            },
            Err(ValidationError::Invalid { message, violation }) => {
                tracing::info!(
                    index,
                    field = %violation.field,
                    rule = %violation.rule,
                    "Record failed validation"
                );
                RecordOutcome {
                    index,
                    message: Some(message),
                    violation: Some(violation),
                }
            }
            Err(ValidationError::Config(err)) => return Err(err.into()),
        };
        outcomes.push(outcome);
    }

    Ok(CheckReport { outcomes })
}

/// Load the files named by `config` and check the document.
pub fn run(config: &CheckConfig) -> Result<CheckReport, CliError> {
    let schema = load_schema(&config.schema_path)?;
    let document = load_document(&config.document_path)?;

    tracing::info!(
        schema = %config.schema_path.display(),
        document = %config.document_path.display(),
        fields = schema.fields.len(),
        "Checking document"
    );

    let report = check_documents(&Validator::default(), &schema, &document)?;

    tracing::info!(
        records = report.outcomes.len(),
        invalid = report.invalid_count(),
        "Check complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use fieldrules_core::ConfigError;
    use serde_json::json;

    use super::*;

    fn schema() -> RecordSchema {
        RecordSchema::from_json(
            r#"{"fields": [
                {"name": "ID", "alias": "id", "rules": "gt=0"},
                {"name": "Locale", "rules": "required,isLocale"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn single_object_is_record_zero() {
        let report = check_documents(
            &Validator::default(),
            &schema(),
            &json!({"id": 1, "Locale": "en"}),
        )
        .unwrap();
        assert!(report.is_valid());
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].to_string(), "record 0: ok");
    }

    #[test]
    fn array_reports_each_record() {
        let document = json!([
            {"id": 1, "Locale": "en"},
            {"id": 0, "Locale": "en"},
            {"id": 2, "Locale": "xx"}
        ]);
        let report = check_documents(&Validator::default(), &schema(), &document).unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.invalid_count(), 2);
        assert_eq!(
            report.outcomes[1].to_string(),
            "record 1: id: Should be greater than 0"
        );
        assert_eq!(report.outcomes[2].to_string(), "record 2: Locale: isLocale");
    }

    #[test]
    fn scalar_documents_are_rejected() {
        assert_matches!(
            check_documents(&Validator::default(), &schema(), &json!(42)),
            Err(CliError::DocumentShape(_))
        );
        assert_matches!(
            check_documents(&Validator::default(), &schema(), &json!([{"id": 1}, 2])),
            Err(CliError::DocumentShape(msg)) if msg.contains("element 1")
        );
    }

    #[test]
    fn broken_schema_aborts_batch() {
        let schema = RecordSchema::from_json(r#"{"fields": [{"name": "ID", "rules": "nope"}]}"#)
            .unwrap();
        assert_matches!(
            check_documents(&Validator::default(), &schema, &json!([{"ID": 1}])),
            Err(CliError::Config(ConfigError::UnknownRule { .. }))
        );
    }

    #[test]
    fn report_serializes_violations() {
        let report = check_documents(
            &Validator::default(),
            &schema(),
            &json!([{"id": 0, "Locale": "en"}]),
        )
        .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["outcomes"][0]["violation"]["field"], "id");
        assert_eq!(value["outcomes"][0]["violation"]["param"], "0");
    }
}
