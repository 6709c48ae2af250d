//! Ordered field/value documents returned by the search backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A search document as an ordered mapping of field name to JSON value.
///
/// Field values keep whatever shape the backend returned: scalar, list
/// or nested object. Presentation code pattern-matches on that shape
/// instead of assuming a fixed type per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Document(Map::new())
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Document(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The field's value if it is a plain string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// All string values under a field, treating a scalar as a
    /// one-element list. Non-string list members are skipped.
    pub fn string_values(&self, field: &str) -> Vec<&str> {
        match self.0.get(field) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }

    pub fn content_id(&self) -> Option<&str> {
        self.str_field("content_id")
    }

    pub fn insert(&mut self, field: &str, value: Value) -> Option<Value> {
        self.0.insert(field.to_string(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Drops every field whose name is not in `keep`, preserving the
    /// order of the survivors.
    pub fn retain_fields(&mut self, keep: &[String]) {
        self.0.retain(|name, _| keep.iter().any(|k| k == name));
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Document(fields)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}
