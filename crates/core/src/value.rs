//! Dynamically typed view of a record field.
//!
//! Records hand their fields to the engine as [`FieldValue`]s borrowed from
//! the record itself, so the rule functions never need to know the concrete
//! record type.

use std::fmt;

use crate::record::{Record, MAX_RECORD_DEPTH};

/// A field value as seen by the rule functions.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// `None`, JSON `null`, or a declared field missing from a document.
    Absent,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Record(&'a dyn Record),
    Seq(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Wrap a slice of records as a sequence value.
    pub fn records<T: Record>(items: &'a [T]) -> Self {
        Self::Seq(
            items
                .iter()
                .map(|item| FieldValue::Record(item as &dyn Record))
                .collect(),
        )
    }

    /// Short name of the value's shape, used in domain mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent value",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Uint(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Record(_) => "record",
            Self::Seq(_) => "sequence",
        }
    }

    /// Whether this is the zero value of its shape.
    ///
    /// Sequences and records are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Bool(b) => !b,
            Self::Int(n) => *n == 0,
            Self::Uint(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Record(_) | Self::Seq(_) => false,
        }
    }

    /// Numeric value of integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Record(_) => f.write_str("Record(..)"),
            Self::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
        }
    }
}

/// Text rendering used when a rule compares against a literal, e.g.
/// `atLeastOneField=Locale:ru`.
impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Record(_) => f.write_str("{..}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Value equality.
///
/// Integers compare exactly, also between `Int` and `Uint`; a float equals an
/// integer only when it holds that exact whole number. Records compare by the
/// values of their [`Record::field_names`], down to [`MAX_RECORD_DEPTH`];
/// records nested deeper than that are unequal unless they are the same
/// record.
impl PartialEq for FieldValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, 0)
    }
}

fn values_equal(a: &FieldValue<'_>, b: &FieldValue<'_>, depth: usize) -> bool {
    use FieldValue::*;

    match (a, b) {
        (Absent, Absent) => true,
        (Bool(a), Bool(b)) => a == b,
        (Str(a), Str(b)) => a == b,
        (Int(a), Int(b)) => a == b,
        (Uint(a), Uint(b)) => a == b,
        (Float(a), Float(b)) => a == b,
        (Int(i), Uint(u)) | (Uint(u), Int(i)) => u64::try_from(*i).is_ok_and(|i| i == *u),
        (Int(i), Float(f)) | (Float(f), Int(i)) => float_is_integer(*f, i128::from(*i)),
        (Uint(u), Float(f)) | (Float(f), Uint(u)) => float_is_integer(*f, i128::from(*u)),
        (Record(a), Record(b)) => records_equal(*a, *b, depth),
        (Seq(a), Seq(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y, depth))
        }
        _ => false,
    }
}

fn float_is_integer(f: f64, n: i128) -> bool {
    // Whole floats below 1e30 fit in an i128, so the cast is exact.
    f.fract() == 0.0 && f.abs() < 1e30 && f as i128 == n
}

fn records_equal(a: &dyn Record, b: &dyn Record, depth: usize) -> bool {
    if std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ()) {
        return true;
    }
    if depth >= MAX_RECORD_DEPTH {
        return false;
    }

    let mut names = a.field_names();
    let mut other_names = b.field_names();
    names.sort_unstable();
    other_names.sort_unstable();
    if names != other_names {
        return false;
    }

    names
        .iter()
        .all(|name| match (a.field(name), b.field(name)) {
            (Some(x), Some(y)) => values_equal(&x, &y, depth + 1),
            (None, None) => true,
            _ => false,
        })
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for FieldValue<'_> {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(value: u32) -> Self {
        Self::Uint(u64::from(value))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value)
    }
}

impl<'a, T> From<Option<T>> for FieldValue<'a>
where
    T: Into<FieldValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl<'a> From<&'a serde_json::Value> for FieldValue<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Absent,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Uint(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::Seq(items.iter().map(FieldValue::from).collect()),
            Value::Object(map) => Self::Record(map),
        }
    }
}
