//! `fieldrules-check` library crate.
//!
//! Re-exports the checker modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod check;
pub mod config;
pub mod error;

pub use check::{
    check_documents, exit_code, render_report, run, CheckReport, RecordOutcome, EXIT_ERROR,
    EXIT_INVALID, EXIT_VALID,
};
pub use config::{CheckConfig, ReportFormat};
pub use error::CliError;
