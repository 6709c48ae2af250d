//! Merges per-collection schemas into the single view queries are built
//! against.

use std::collections::{BTreeMap, BTreeSet};

use trawl_core::error::{Error, Result};

use crate::fields::{CollectionSchema, ExpansionEntry, FieldDefinition};

/// The union of every collection's field definitions.
///
/// Built once at startup and treated as read-only; a schema reload builds
/// a fresh instance. A field declared with different types in two
/// collections is a configuration fault and fails the build.
#[derive(Debug, Clone)]
pub struct CombinedSchema {
    field_definitions: BTreeMap<String, FieldDefinition>,
    allowed_filter_fields: BTreeSet<String>,
}

impl CombinedSchema {
    pub fn build(collections: &[CollectionSchema]) -> Result<Self> {
        let mut merged: BTreeMap<String, FieldDefinition> = BTreeMap::new();
        let mut declared_in: BTreeMap<String, String> = BTreeMap::new();

        for collection in collections {
            for field in &collection.fields {
                match merged.get_mut(&field.name) {
                    None => {
                        merged.insert(field.name.clone(), field.clone());
                        declared_in.insert(field.name.clone(), collection.name.clone());
                    }
                    Some(existing) => {
                        if existing.field_type != field.field_type {
                            let first = declared_in
                                .get(&field.name)
                                .map(String::as_str)
                                .unwrap_or("?");
                            return Err(Error::InvalidConfig(format!(
                                "field '{}' is {} in '{}' but {} in '{}'",
                                field.name,
                                existing.field_type.label(),
                                first,
                                field.field_type.label(),
                                collection.name
                            )));
                        }
                        existing.filterable = existing.filterable || field.filterable;
                        merge_expansion(&mut existing.expansion, &field.expansion);
                    }
                }
            }
        }

        let allowed_filter_fields = merged
            .values()
            .filter(|field| field.filterable)
            .map(|field| field.name.clone())
            .collect();

        Ok(CombinedSchema {
            field_definitions: merged,
            allowed_filter_fields,
        })
    }

    pub fn field_definitions(&self) -> &BTreeMap<String, FieldDefinition> {
        &self.field_definitions
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_definitions.get(name)
    }

    pub fn allowed_filter_fields(&self) -> &BTreeSet<String> {
        &self.allowed_filter_fields
    }

    pub fn is_filterable(&self, name: &str) -> bool {
        self.allowed_filter_fields.contains(name)
    }
}

// Union by value, keeping first-seen order. A value declared again in a
// later collection keeps its position but takes the later label.
fn merge_expansion(existing: &mut Vec<ExpansionEntry>, incoming: &[ExpansionEntry]) {
    for entry in incoming {
        match existing.iter_mut().find(|e| e.value == entry.value) {
            Some(current) => current.label = entry.label.clone(),
            None => existing.push(entry.clone()),
        }
    }
}
