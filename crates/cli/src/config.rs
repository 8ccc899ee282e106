use std::path::PathBuf;

use crate::error::CliError;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One `record {index}: ...` line per record.
    #[default]
    Text,
    /// The whole report as a JSON object.
    Json,
}

/// Checker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// JSON rule schema (`{"fields": [...]}`).
    pub schema_path: PathBuf,
    /// JSON object, or array of objects, to validate.
    pub document_path: PathBuf,
    pub format: ReportFormat,
}

impl CheckConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var         | Default |
    /// |-----------------|---------|
    /// | `SCHEMA_PATH`   | --      |
    /// | `DOCUMENT_PATH` | --      |
    /// | `REPORT_FORMAT` | `text`  |
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(CliError::MissingEnv(name))
        };

        let schema_path = PathBuf::from(required("SCHEMA_PATH")?);
        let document_path = PathBuf::from(required("DOCUMENT_PATH")?);

        let format = match lookup("REPORT_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => ReportFormat::Text,
            Some("json") => ReportFormat::Json,
            Some(other) => {
                return Err(CliError::InvalidEnv {
                    name: "REPORT_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            schema_path,
            document_path,
            format,
        })
    }
}
