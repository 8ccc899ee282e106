use std::path::PathBuf;

use fieldrules_core::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0} environment variable is required")]
    MissingEnv(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported document shape: {0}")]
    DocumentShape(String),

    #[error("Invalid rule schema: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}
