//! Final hit presentation: registry-backed reference fields are expanded
//! from slugs into embedded entity documents.

use serde_json::{json, Value};

use trawl_core::document::Document;
use trawl_core::error::Result;
use trawl_registry::{EntityRegistry, Registries};

pub struct ResultPresenter;

impl ResultPresenter {
    pub fn present(response: &Value, registries: &Registries) -> Result<Vec<Document>> {
        let hits = response["hits"]["hits"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        hits.iter()
            .map(|hit| Self::present_hit(hit, registries))
            .collect()
    }

    fn present_hit(hit: &Value, registries: &Registries) -> Result<Document> {
        let mut document = Document::new();
        if let Some(fields) = hit["fields"].as_object() {
            for (name, value) in fields {
                let presented = match registries.for_field(name) {
                    Some(registry) => expand_field(value, registry)?,
                    None => value.clone(),
                };
                document.insert(name, presented);
            }
        }
        // Present only when the backend ran with explain enabled.
        if let Some(explanation) = hit.get("_explanation") {
            document.insert("_explanation", explanation.clone());
        }
        Ok(document)
    }
}

// Shapes are preserved: a scalar slug expands to one object, a list to a
// list of objects, anything else passes through untouched.
fn expand_field(value: &Value, registry: &EntityRegistry) -> Result<Value> {
    match value {
        Value::String(slug) => expand_slug(slug, registry),
        Value::Array(slugs) => {
            let expanded = slugs
                .iter()
                .map(|entry| match entry {
                    Value::String(slug) => expand_slug(slug, registry),
                    other => Ok(other.clone()),
                })
                .collect::<Result<Vec<Value>>>()?;
            Ok(Value::Array(expanded))
        }
        other => Ok(other.clone()),
    }
}

// An unknown slug still presents as an object so consumers see one shape.
fn expand_slug(slug: &str, registry: &EntityRegistry) -> Result<Value> {
    match registry.get(slug)? {
        Some(entity) => Ok(Value::Object(entity.into_map())),
        None => Ok(json!({ "slug": slug })),
    }
}
