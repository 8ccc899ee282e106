//! Rule schemas for JSON documents.
//!
//! A [`RecordSchema`] declares the fields of a JSON object and their rule
//! annotations:
//!
//! ```json
//! { "fields": [
//!     { "name": "ID", "alias": "id", "rules": "gt=0" },
//!     { "name": "Item", "alias": "item", "nested": "ID>>gt=0;Locale>>required" }
//! ] }
//! ```
//!
//! Binding an object to the schema yields a [`Document`], which the
//! validator treats like any other record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{FieldSpec, Record};
use crate::value::FieldValue;

/// Declared fields of a JSON object, in validation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// View `object` as a record with this schema's fields.
    pub fn bind<'a>(&'a self, object: &'a Map<String, Value>) -> Document<'a> {
        Document {
            schema: self,
            object,
        }
    }
}

/// A JSON object bound to a [`RecordSchema`].
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    schema: &'a RecordSchema,
    object: &'a Map<String, Value>,
}

impl Document<'_> {
    pub fn object(&self) -> &Map<String, Value> {
        self.object
    }
}

impl Record for Document<'_> {
    fn field_specs(&self) -> &[FieldSpec] {
        &self.schema.fields
    }

    /// Declared fields are read by name, falling back to the alias. A
    /// declared field missing from the object is absent; an undeclared one
    /// does not exist.
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let spec = self.schema.fields.iter().find(|spec| spec.name == name)?;
        let value = self.object.get(&spec.name).or_else(|| {
            spec.alias
                .as_deref()
                .filter(|alias| !alias.is_empty())
                .and_then(|alias| self.object.get(alias))
        });
        Some(value.map_or(FieldValue::Absent, FieldValue::from))
    }
}
