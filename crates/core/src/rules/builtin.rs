//! Built-in scalar rules.
//!
//! Comparisons measure a value the same way for every ordering rule:
//! numbers by value, strings by character count, sequences by length.
//! `eq`/`ne` compare strings by text and booleans by value instead.

use std::cmp::Ordering;

use validator::{ValidateEmail, ValidateUrl};

use super::registry::{Arity, RuleArgs, RuleRegistryBuilder};
use super::sequence;
use crate::error::ConfigError;
use crate::locale::is_locale_code;
use crate::value::FieldValue;

/// Add every built-in rule to `builder`.
pub(crate) fn register(builder: RuleRegistryBuilder) -> RuleRegistryBuilder {
    builder
        .register("required", Arity::None, required)
        .register("eq", Arity::Required, eq)
        .register("ne", Arity::Required, ne)
        .register("gt", Arity::Required, |v, a| compare(v, a, Ordering::is_gt))
        .register("gte", Arity::Required, |v, a| compare(v, a, Ordering::is_ge))
        .register("lt", Arity::Required, |v, a| compare(v, a, Ordering::is_lt))
        .register("lte", Arity::Required, |v, a| compare(v, a, Ordering::is_le))
        .register("len", Arity::Required, |v, a| compare(v, a, Ordering::is_eq))
        .register("min", Arity::Required, |v, a| compare(v, a, Ordering::is_ge))
        .register("max", Arity::Required, |v, a| compare(v, a, Ordering::is_le))
        .register("oneof", Arity::Required, one_of)
        .register("email", Arity::None, email)
        .register("url", Arity::None, url)
        .register("isLocale", Arity::None, is_locale)
        .register("uniqueField", Arity::Required, sequence::unique_field)
        .register("atLeastOneField", Arity::Required, sequence::at_least_one_field)
        .register("isLocaleField", Arity::Required, sequence::is_locale_field)
}

fn required(value: &FieldValue<'_>, _: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    Ok(!value.is_zero())
}

/// A measured quantity. Integers, lengths and counts stay exact; anything
/// involving a float is compared as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Quantity {
    Exact(i128),
    Approx(f64),
}

impl Quantity {
    fn parse(text: &str) -> Option<Self> {
        match text.parse::<i128>() {
            Ok(n) => Some(Self::Exact(n)),
            Err(_) => text.parse::<f64>().ok().map(Self::Approx),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Exact(n) => n as f64,
            Self::Approx(x) => x,
        }
    }

    fn compare_to(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

fn param_quantity(args: &RuleArgs<'_>) -> Result<Quantity, ConfigError> {
    Quantity::parse(args.param)
        .ok_or_else(|| ConfigError::invalid_param(args.rule, args.param, "expected a number"))
}

/// The quantity ordering rules compare, or `None` for an absent value.
fn measure(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<Option<Quantity>, ConfigError> {
    match value {
        FieldValue::Absent => Ok(None),
        FieldValue::Int(n) => Ok(Some(Quantity::Exact(i128::from(*n)))),
        FieldValue::Uint(n) => Ok(Some(Quantity::Exact(i128::from(*n)))),
        FieldValue::Float(x) => Ok(Some(Quantity::Approx(*x))),
        FieldValue::Str(s) => Ok(Some(Quantity::Exact(s.chars().count() as i128))),
        FieldValue::Seq(items) => Ok(Some(Quantity::Exact(items.len() as i128))),
        FieldValue::Bool(_) | FieldValue::Record(_) => Err(ConfigError::domain_mismatch(
            args.rule,
            "number, string or sequence",
            value.kind(),
        )),
    }
}

/// Measure `value` against the parameter. `accept` decides which orderings
/// pass; NaN and absent values never pass.
fn compare(
    value: &FieldValue<'_>,
    args: &RuleArgs<'_>,
    accept: fn(Ordering) -> bool,
) -> Result<bool, ConfigError> {
    let limit = param_quantity(args)?;
    Ok(measure(value, args)?
        .and_then(|actual| actual.compare_to(limit))
        .is_some_and(accept))
}

fn eq(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    match value {
        FieldValue::Str(s) => Ok(*s == args.param),
        FieldValue::Bool(b) => args
            .param
            .parse::<bool>()
            .map(|expected| *b == expected)
            .map_err(|_| {
                ConfigError::invalid_param(args.rule, args.param, "expected true or false")
            }),
        _ => compare(value, args, Ordering::is_eq),
    }
}

fn ne(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    eq(value, args).map(|equal| !equal)
}

fn one_of(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    let mut allowed = args.param.split_whitespace().peekable();
    if allowed.peek().is_none() {
        return Err(ConfigError::invalid_param(
            args.rule,
            args.param,
            "expected a space-separated list",
        ));
    }

    match value {
        FieldValue::Absent => Ok(false),
        FieldValue::Str(s) => Ok(allowed.any(|candidate| candidate == *s)),
        FieldValue::Int(_) | FieldValue::Uint(_) | FieldValue::Float(_) => {
            let text = value.to_string();
            Ok(allowed.any(|candidate| candidate == text))
        }
        other => Err(ConfigError::domain_mismatch(
            args.rule,
            "string or number",
            other.kind(),
        )),
    }
}

fn text<'a>(value: &FieldValue<'a>, args: &RuleArgs<'_>) -> Result<Option<&'a str>, ConfigError> {
    match value {
        FieldValue::Absent => Ok(None),
        FieldValue::Str(s) => Ok(Some(*s)),
        other => Err(ConfigError::domain_mismatch(args.rule, "string", other.kind())),
    }
}

fn email(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    Ok(text(value, args)?.is_some_and(|s| s.validate_email()))
}

fn url(value: &FieldValue<'_>, args: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    Ok(text(value, args)?.is_some_and(|s| s.validate_url()))
}

/// Non-strings are simply not locale codes.
fn is_locale(value: &FieldValue<'_>, _: &RuleArgs<'_>) -> Result<bool, ConfigError> {
    Ok(value.as_str().is_some_and(is_locale_code))
}
