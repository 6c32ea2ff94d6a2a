//! Data model for catalog records, staged records and templates.
//!
//! Catalog objects are kept as open JSON maps. Nothing beyond the `Name`
//! identity and the merge allow-lists is given a typed accessor, so fields
//! added to the catalog later flow through staging untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of catalog object being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A catalog database
    Database,
    /// A table inside a catalog database
    Table,
}

impl ObjectKind {
    /// Suffix appended to the object name for scratch and output files.
    pub const fn stage_suffix(self) -> &'static str {
        match self {
            Self::Database => "_SourceDatabase",
            Self::Table => "_SourceTable",
        }
    }

    /// Scratch name for an object of this kind. The merger derives its
    /// input file from the same name, so both sides must call this.
    pub fn stage_name(self, object_name: &str) -> String {
        format!("{}{}", object_name, self.stage_suffix())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// A database or table exactly as the catalog service returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(Map<String, Value>);

impl CatalogRecord {
    /// Wraps a raw field map.
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The object's `Name`, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("Name").and_then(Value::as_str)
    }

    /// Borrow the underlying field map.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// A catalog record with the volatile, server-assigned fields removed.
///
/// Only [`crate::sanitize::sanitize`] constructs these from catalog records;
/// staged files are read back through deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizedRecord(Map<String, Value>);

impl SanitizedRecord {
    pub(crate) const fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The object's `Name`, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("Name").and_then(Value::as_str)
    }

    /// Borrow the underlying field map.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Iterates fields in map order (sorted by key).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// On-disk shape of a scratch file: `{"GLUE": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedRecord {
    /// The sanitized catalog object
    #[serde(rename = "GLUE")]
    pub record: SanitizedRecord,
}

/// A deployment template loaded as generic JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateDocument(Value);

impl TemplateDocument {
    /// Wraps a parsed template.
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the template as JSON.
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Value at a path of object keys, if every segment exists.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.0, |node, segment| node.get(*segment))
    }

    /// Overwrites the value at `path`, creating missing intermediate objects.
    ///
    /// Returns the dotted prefix of the first segment whose parent is not a
    /// JSON object; nothing is written in that case.
    pub fn set_path(&mut self, path: &[&str], value: Value) -> std::result::Result<(), String> {
        let Some((leaf, parents)) = path.split_last() else {
            self.0 = value;
            return Ok(());
        };

        let mut node = &mut self.0;
        for (depth, segment) in parents.iter().enumerate() {
            let Value::Object(map) = node else {
                return Err(path[..depth].join("."));
            };
            node = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        match node {
            Value::Object(map) => {
                map.insert((*leaf).to_string(), value);
                Ok(())
            }
            _ => Err(parents.join(".")),
        }
    }
}
