//! `fieldrules-check` -- validates JSON documents against a rule schema.
//!
//! Reads a schema of field rule annotations and a JSON document (one object
//! or an array of objects), validates every record and prints one line per
//! record.
//!
//! # Environment variables
//!
//! | Variable        | Required | Default | Description                           |
//! |-----------------|----------|---------|---------------------------------------|
//! | `SCHEMA_PATH`   | yes      | --      | JSON rule schema, `{"fields": [...]}` |
//! | `DOCUMENT_PATH` | yes      | --      | JSON object or array of objects       |
//! | `REPORT_FORMAT` | no       | `text`  | `text` or `json`                      |
//! | `RUST_LOG`      | no       | `fieldrules_cli=info,fieldrules_core=info` | Log filter |
//!
//! # Exit codes
//!
//! `0` every record is valid, `1` at least one record is invalid, `2` the
//! configuration, schema or document could not be used.

use std::process::ExitCode;

use fieldrules_cli::{exit_code, render_report, run, CheckConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldrules_cli=info,fieldrules_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = CheckConfig::from_env().and_then(|config| {
        let report = run(&config)?;
        print!("{}", render_report(&report, config.format)?);
        Ok(report)
    });

    if let Err(err) = &result {
        tracing::error!(error = %err, "Check failed");
    }

    ExitCode::from(exit_code(&result))
}
