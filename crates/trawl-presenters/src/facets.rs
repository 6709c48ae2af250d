//! Facet computation over raw backend aggregations: option decoration,
//! composite ordering, missing-value accounting and example embedding.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use trawl_core::document::Document;
use trawl_core::error::{Error, Result};
use trawl_core::traits::ExampleFetcher;
use trawl_core::types::{
    ExampleScope, FacetOrder, FacetOrderKey, FacetRequest, FacetScope, Filter, SortDirection,
};
use trawl_schema::{CombinedSchema, FieldDefinition};

/// Serving default: filtered options first, then most documents, then
/// slug for stability.
const DEFAULT_ORDER: [FacetOrder; 3] = [
    FacetOrder {
        key: FacetOrderKey::FilteredFirst,
        direction: SortDirection::Asc,
    },
    FacetOrder {
        key: FacetOrderKey::Count,
        direction: SortDirection::Desc,
    },
    FacetOrder {
        key: FacetOrderKey::Slug,
        direction: SortDirection::Asc,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOption {
    /// Raw bucket key, or `{"value", "label"}` when the field's expansion
    /// list knows the key.
    pub value: Value,
    pub documents: u64,
    pub is_currently_filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_info: Option<ExampleInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleInfo {
    pub total: u64,
    pub examples: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetResult {
    pub options: Vec<FacetOption>,
    pub documents_with_no_value: u64,
    pub total_options: usize,
    pub missing_options: usize,
    pub scope: FacetScope,
}

pub struct FacetCalculator;

impl FacetCalculator {
    /// Turns raw per-facet aggregations into ordered, decorated option
    /// lists. A facet on a field that is not filterable is a request
    /// fault, not a silent skip.
    pub fn compute(
        requests: &[FacetRequest],
        filters: &[Filter],
        raw_aggregations: &Value,
        schema: &CombinedSchema,
        example_fetcher: &dyn ExampleFetcher,
        query: Option<&str>,
    ) -> Result<BTreeMap<String, FacetResult>> {
        let mut results = BTreeMap::new();
        for request in requests {
            if !schema.is_filterable(&request.field) {
                return Err(Error::InvalidRequest(format!(
                    "facet field '{}' is not filterable",
                    request.field
                )));
            }
            let result = Self::compute_one(
                request,
                filters,
                &raw_aggregations[request.field.as_str()],
                schema.field(&request.field),
                example_fetcher,
                query,
            )?;
            results.insert(request.field.clone(), result);
        }
        Ok(results)
    }

    fn compute_one(
        request: &FacetRequest,
        filters: &[Filter],
        aggregation: &Value,
        definition: Option<&FieldDefinition>,
        example_fetcher: &dyn ExampleFetcher,
        query: Option<&str>,
    ) -> Result<FacetResult> {
        let own_filter_values: Vec<&str> = filters
            .iter()
            .find(|filter| !filter.reject && filter.field == request.field)
            .map(Filter::allowed_values)
            .unwrap_or_default();

        let buckets = aggregation["filtered_aggregations"]["buckets"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mut options: Vec<FacetOption> = buckets
            .iter()
            .map(|bucket| {
                let key = &bucket["key"];
                let is_currently_filtered = key
                    .as_str()
                    .is_some_and(|key| own_filter_values.contains(&key));
                FacetOption {
                    value: decorate(key, definition),
                    documents: bucket["doc_count"].as_u64().unwrap_or(0),
                    is_currently_filtered,
                    example_info: None,
                }
            })
            .collect();

        let total_options = options.len();
        let order: &[FacetOrder] = if request.order.is_empty() {
            &DEFAULT_ORDER
        } else {
            &request.order
        };
        options.sort_by(|a, b| compare_options(a, b, order));
        options.truncate(request.requested_count);
        let missing_options = total_options - options.len();

        if let Some(spec) = &request.examples {
            let scoped_query = match spec.scope {
                ExampleScope::Query => query,
                ExampleScope::Global => None,
            };
            for option in &mut options {
                let Some(value) = option.slug_key().map(str::to_string) else {
                    continue;
                };
                let examples = example_fetcher.fetch(
                    &request.field,
                    &value,
                    spec.count,
                    &spec.fields,
                    scoped_query,
                )?;
                option.example_info = Some(ExampleInfo {
                    total: examples.len() as u64,
                    examples,
                });
            }
        }

        debug!(
            field = request.field.as_str(),
            total_options, "facet computed"
        );
        Ok(FacetResult {
            options,
            documents_with_no_value: aggregation["missing_value"]["doc_count"]
                .as_u64()
                .unwrap_or(0),
            total_options,
            missing_options,
            scope: request.scope,
        })
    }
}

fn decorate(key: &Value, definition: Option<&FieldDefinition>) -> Value {
    let Some(key_str) = key.as_str() else {
        return key.clone();
    };
    let Some(definition) = definition else {
        return key.clone();
    };
    match definition.expansion.iter().find(|e| e.value == key_str) {
        Some(entry) => json!({ "value": entry.value, "label": entry.label }),
        None => key.clone(),
    }
}

impl FacetOption {
    /// The underlying stored value, whatever the decoration.
    fn slug_key(&self) -> Option<&str> {
        match &self.value {
            Value::String(slug) => Some(slug),
            Value::Object(map) => map.get("value").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The human-facing value: the label when decorated, the raw value
    /// otherwise.
    fn label_key(&self) -> Option<&str> {
        match &self.value {
            Value::String(value) => Some(value),
            Value::Object(map) => map.get("label").and_then(Value::as_str),
            _ => None,
        }
    }

    fn link_key(&self) -> Option<&str> {
        match &self.value {
            Value::Object(map) => map.get("link").and_then(Value::as_str),
            _ => None,
        }
    }
}

// Left-to-right fold over the configured keys, short-circuiting on the
// first non-equal comparison; slug ascending breaks any remaining tie so
// ordering never depends on sort stability.
fn compare_options(a: &FacetOption, b: &FacetOption, order: &[FacetOrder]) -> Ordering {
    for spec in order {
        let ordering = match spec.key {
            FacetOrderKey::FilteredFirst => {
                b.is_currently_filtered.cmp(&a.is_currently_filtered)
            }
            FacetOrderKey::Count => a.documents.cmp(&b.documents),
            FacetOrderKey::Value => a.label_key().cmp(&b.label_key()),
            FacetOrderKey::Slug => a.slug_key().cmp(&b.slug_key()),
            FacetOrderKey::Link => a.link_key().cmp(&b.link_key()),
            FacetOrderKey::Title => {
                let left = a.label_key().map(str::to_lowercase);
                let right = b.label_key().map(str::to_lowercase);
                left.cmp(&right)
            }
        };
        let ordering = match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.slug_key().cmp(&b.slug_key())
}
