//! Rule annotation grammar.
//!
//! Two small languages are parsed here:
//!
//! - simple rules attached to a field: `required,gt=0,oneof=a b`
//! - nested rules attached to a record-valued field, naming fields of the
//!   nested record: `ID>>gt=0;Locale>>required,len=2`
//!
//! Whitespace around the delimiters (`;`, `>>`, `,`, `=`) is trimmed, so an
//! annotation may be spread over several lines. Whitespace inside a
//! parameter's own structure is kept.

use crate::error::{GrammarError, GrammarErrorKind, NESTED_RULES_SYNTAX, RULES_SYNTAX};

/// Separator between a nested field name and its rules.
const NESTED_SEPARATOR: &str = ">>";

/// One `name` or `name=param` token of a simple rule annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub name: String,
    pub param: Option<String>,
}

impl RuleToken {
    pub fn new(name: impl Into<String>, param: Option<&str>) -> Self {
        Self {
            name: name.into(),
            param: param.map(str::to_string),
        }
    }

    /// The parameter, or `""` when the token has none.
    pub fn param_str(&self) -> &str {
        self.param.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for RuleToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}={param}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One `Field>>rules` entry of a nested rule annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedRule {
    /// Field of the nested record.
    pub field: String,
    /// Simple rule annotation applied to that field; may hold several
    /// comma-separated tokens.
    pub rules: String,
}

/// Parse a simple rule annotation into tokens, in declaration order.
///
/// Empty tokens (`gt=0,,lt=9`, or an empty annotation) are skipped.
pub fn parse_rules(annotation: &str) -> Result<Vec<RuleToken>, GrammarError> {
    annotation
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<RuleToken, GrammarError> {
    let (name, param) = match token.split_once('=') {
        Some((name, param)) => (name.trim(), Some(param.trim())),
        None => (token, None),
    };

    if name.is_empty() {
        return Err(GrammarError {
            entry: token.to_string(),
            kind: GrammarErrorKind::EmptyRuleName,
            syntax: RULES_SYNTAX,
        });
    }

    Ok(RuleToken::new(name, param))
}

/// Parse a nested rule annotation into entries, in declaration order.
///
/// ```
/// use fieldrules_core::annotation::parse_nested_rules;
///
/// let entries = parse_nested_rules("ID>>gt=0;Locale>>required,len=2").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].field, "Locale");
/// assert_eq!(entries[1].rules, "required,len=2");
/// ```
///
/// Empty entries are skipped. Repeated field names are all kept.
pub fn parse_nested_rules(annotation: &str) -> Result<Vec<NestedRule>, GrammarError> {
    let mut entries = Vec::new();

    for entry in annotation.split(';').map(str::trim) {
        if entry.is_empty() {
            continue;
        }

        let parts: Vec<&str> = entry.split(NESTED_SEPARATOR).map(str::trim).collect();
        let fail = |kind| GrammarError {
            entry: entry.to_string(),
            kind,
            syntax: NESTED_RULES_SYNTAX,
        };

        let (field, rules) = match parts.as_slice() {
            [_] => return Err(fail(GrammarErrorKind::MissingSeparator)),
            [field, rules] => (*field, *rules),
            _ => return Err(fail(GrammarErrorKind::ExtraSeparator)),
        };

        if field.is_empty() {
            return Err(fail(GrammarErrorKind::EmptyField));
        }
        if rules.is_empty() {
            return Err(fail(GrammarErrorKind::EmptyRules));
        }

        entries.push(NestedRule {
            field: field.to_string(),
            rules: rules.to_string(),
        });
    }

    Ok(entries)
}
