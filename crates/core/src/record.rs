//! Records and dynamic field resolution.
//!
//! A [`Record`] exposes its declared fields (with their rule annotations)
//! and hands out field values by name. Record types usually build a
//! [`FieldTable`] once and delegate both methods to it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::FieldValue;

/// How deep records may nest inside one another, counting the outermost
/// record as depth zero. Validation and value equality stop here.
pub const MAX_RECORD_DEPTH: usize = 32;

/// Declaration of one record field and the rules attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field identifier used for lookup.
    pub name: String,
    /// Display name used in messages, e.g. the serialized field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Simple rule annotation, e.g. `required,gt=0`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rules: String,
    /// Rules for the fields of the nested record this field holds, e.g.
    /// `ID>>gt=0;Locale>>required,len=2`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nested: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn nested(mut self, nested: impl Into<String>) -> Self {
        self.nested = nested.into();
        self
    }

    /// The name shown to users: the alias when declared, else the field name.
    pub fn label(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|alias| !alias.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Structured data whose fields can be looked up by name at run time.
pub trait Record {
    /// Declared fields in declaration order. Records without declarations
    /// (plain JSON objects, for instance) return an empty slice.
    fn field_specs(&self) -> &[FieldSpec] {
        &[]
    }

    /// Current value of the field called `name`, or `None` if the record has
    /// no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Names of the fields that make up the record's value. Two records are
    /// equal when they have the same names with equal values.
    fn field_names(&self) -> Vec<&str> {
        self.field_specs()
            .iter()
            .map(|spec| spec.name.as_str())
            .collect()
    }
}

/// JSON objects are records without declared rules. Missing keys resolve to
/// [`FieldValue::Absent`].
impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(self.get(name).map_or(FieldValue::Absent, FieldValue::from))
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// Extracts one field from a record of type `T`.
pub type Getter<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// Per-type accessor table: declared fields plus one getter each.
///
/// Build it once per record type, typically in a `LazyLock`:
///
/// ```
/// use std::sync::LazyLock;
/// use fieldrules_core::record::{FieldSpec, FieldTable, Record};
/// use fieldrules_core::value::FieldValue;
///
/// struct Item {
///     id: i64,
///     locale: String,
/// }
///
/// static ITEM_FIELDS: LazyLock<FieldTable<Item>> = LazyLock::new(|| {
///     FieldTable::<Item>::new()
///         .field(FieldSpec::new("ID").rules("gt=0"), |item| item.id.into())
///         .field(FieldSpec::new("Locale").rules("isLocale"), |item| (&item.locale).into())
/// });
///
/// impl Record for Item {
///     fn field_specs(&self) -> &[FieldSpec] {
///         ITEM_FIELDS.specs()
///     }
///
///     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
///         ITEM_FIELDS.get(self, name)
///     }
/// }
///
/// let item = Item { id: 7, locale: "en".into() };
/// assert_eq!(item.field("ID"), Some(FieldValue::Int(7)));
/// assert_eq!(item.field("Missing"), None);
/// ```
pub struct FieldTable<T> {
    specs: Vec<FieldSpec>,
    getters: Vec<Getter<T>>,
}

impl<T> FieldTable<T> {
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            getters: Vec::new(),
        }
    }

    /// Declare the next field. Declaration order is validation order.
    pub fn field(mut self, spec: FieldSpec, getter: Getter<T>) -> Self {
        self.specs.push(spec);
        self.getters.push(getter);
        self
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Read the field called `name` from `record`.
    pub fn get<'a>(&self, record: &'a T, name: &str) -> Option<FieldValue<'a>> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|index| (self.getters[index])(record))
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a field by name.
///
/// A missing field is a programmer error: the annotation names a field the
/// record does not have.
pub fn resolve<'a>(record: &'a dyn Record, name: &str) -> Result<FieldValue<'a>, ConfigError> {
    record.field(name).ok_or_else(|| ConfigError::FieldNotFound {
        field: name.to_string(),
    })
}

/// Look up `name` on every element of a sequence value, for the rule `rule`.
///
/// An absent sequence has no elements. Anything that is not a sequence of
/// records is a domain mismatch.
pub fn resolve_each<'a>(
    value: &FieldValue<'a>,
    rule: &str,
    name: &str,
) -> Result<Vec<FieldValue<'a>>, ConfigError> {
    let elements = match value {
        FieldValue::Seq(elements) => elements.as_slice(),
        FieldValue::Absent => return Ok(Vec::new()),
        other => {
            return Err(ConfigError::domain_mismatch(rule, "sequence", other.kind()));
        }
    };

    elements
        .iter()
        .map(|element| match element {
            FieldValue::Record(record) => resolve(*record, name),
            other => Err(ConfigError::domain_mismatch(
                rule,
                "sequence of records",
                other.kind(),
            )),
        })
        .collect()
}
