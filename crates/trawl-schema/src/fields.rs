//! Field definitions contributed by each document collection.

use serde::{Deserialize, Serialize};

/// How a field is indexed, which controls filtering, sorting and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Opaque slug or id, matched exactly.
    Identifier,
    /// Analysed free text.
    SearchableText,
    /// Analysed free text with a raw `.sort` subfield for ordering.
    SearchableSortableText,
    Date,
    Boolean,
}

impl FieldType {
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Identifier => "identifier",
            FieldType::SearchableText => "searchable_text",
            FieldType::SearchableSortableText => "searchable_sortable_text",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }
}

/// Maps a stored field value to a human label for facet display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionEntry {
    pub value: String,
    pub label: String,
}

impl ExpansionEntry {
    pub fn new(value: &str, label: &str) -> Self {
        ExpansionEntry {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub expansion: Vec<ExpansionEntry>,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        FieldDefinition {
            name: name.to_string(),
            field_type,
            filterable: false,
            expansion: Vec::new(),
        }
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn with_expansion(mut self, expansion: Vec<ExpansionEntry>) -> Self {
        self.expansion = expansion;
        self
    }
}

/// The fields one collection declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl CollectionSchema {
    pub fn new(name: &str, fields: Vec<FieldDefinition>) -> Self {
        CollectionSchema {
            name: name.to_string(),
            fields,
        }
    }
}
