use crate::validator::Violation;

/// Syntax shown back to the author of a malformed simple rule annotation.
pub const RULES_SYNTAX: &str = "rule,rule=param";

/// Syntax shown back to the author of a malformed nested rule annotation.
pub const NESTED_RULES_SYNTAX: &str = "Field>>rule;Field>>rule=param";

/// What exactly is wrong with an annotation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarErrorKind {
    /// A nested entry has no `>>` separator.
    MissingSeparator,
    /// A nested entry has more than one `>>` separator.
    ExtraSeparator,
    /// A nested entry has nothing before `>>`.
    EmptyField,
    /// A nested entry has nothing after `>>`.
    EmptyRules,
    /// A rule token has nothing before `=`.
    EmptyRuleName,
}

impl std::fmt::Display for GrammarErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingSeparator => "missing `>>` separator",
            Self::ExtraSeparator => "more than one `>>` separator",
            Self::EmptyField => "empty field name",
            Self::EmptyRules => "empty rule list",
            Self::EmptyRuleName => "empty rule name",
        };
        f.write_str(text)
    }
}

/// A rule annotation that does not follow its grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed rule annotation `{entry}`: {kind} (expected `{syntax}`)")]
pub struct GrammarError {
    pub entry: String,
    pub kind: GrammarErrorKind,
    pub syntax: &'static str,
}

/// Programmer errors: the annotations or rule set are wrong, not the data.
///
/// These abort the current validation call and are never reported as a
/// field violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Unknown rule: {rule}")]
    UnknownRule { rule: String },

    #[error("Rule {rule} requires a parameter")]
    MissingParam { rule: String },

    #[error("Rule {rule} takes no parameter, got `{param}`")]
    UnexpectedParam { rule: String, param: String },

    #[error("Invalid parameter `{param}` for rule {rule}: {reason}")]
    InvalidParam {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("Rule {rule} expects a {expected}, got {found}")]
    DomainMismatch {
        rule: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    #[error("Records nest more than {limit} levels deep at {field}")]
    NestingTooDeep { field: String, limit: usize },
}

impl ConfigError {
    pub(crate) fn invalid_param(rule: &str, param: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            rule: rule.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn domain_mismatch(rule: &str, expected: &'static str, found: &'static str) -> Self {
        Self::DomainMismatch {
            rule: rule.to_string(),
            expected,
            found,
        }
    }
}

/// Outcome of a failed validation call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The data broke a rule. `message` is the user-facing `"{label}: {text}"`.
    #[error("Input validation error: {message}")]
    Invalid {
        message: String,
        violation: Violation,
    },

    /// The annotations or rule set are broken.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ValidationError {
    /// Whether this is an ordinary data failure rather than a programmer error.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// The formatted user-facing message of a data failure.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Invalid { message, .. } => Some(message),
            Self::Config(_) => None,
        }
    }
}
