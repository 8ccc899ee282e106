//! Annotation-driven field validation.
//!
//! Records carry compact rule annotations per field (`required,gt=0`, or
//! `ID>>gt=0;Locale>>isLocale` for the fields of a nested record). The
//! engine parses them, resolves field values by name and reports the first
//! rule that fails as `"{label}: {message}"`.
//!
//! - [`Validator`] — plans and runs validation of a [`Record`].
//! - [`RuleRegistry`] — named rules, built through [`RuleRegistryBuilder`]
//!   and frozen afterwards.
//! - [`FieldTable`] — per-type accessor table for implementing [`Record`].
//! - [`RecordSchema`] — rule declarations for plain JSON objects.

pub mod annotation;
pub mod error;
pub mod locale;
pub mod message;
pub mod record;
pub mod rules;
pub mod schema;
pub mod validator;
pub mod value;

pub use error::{ConfigError, GrammarError, ValidationError};
pub use record::{FieldSpec, FieldTable, Record, MAX_RECORD_DEPTH};
pub use rules::{Arity, RuleRegistry, RuleRegistryBuilder};
pub use schema::{Document, RecordSchema};
pub use self::validator::{validate, Validator, Violation};
pub use value::FieldValue;
