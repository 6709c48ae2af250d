//! Facet aggregation payloads with per-facet filter scoping.
//!
//! Each facet gets its own filter aggregation so its counts can exclude a
//! filter on the facet's own field. Hits are narrowed by the post-filter
//! instead, which leaves these scopes untouched.

use serde_json::{json, Map, Value};

use trawl_core::types::{FacetRequest, FacetScope, Filter};

use crate::filters;

// Options are ordered and truncated client-side, so the terms aggregation
// asks for effectively every bucket.
const MAX_OBSERVED_OPTIONS: usize = 100_000;

pub fn expression(facets: &[FacetRequest], active: &[Filter]) -> Value {
    let mut aggregations = Map::new();
    for facet in facets {
        aggregations.insert(facet.field.clone(), facet_aggregation(facet, active));
    }
    Value::Object(aggregations)
}

fn facet_aggregation(facet: &FacetRequest, active: &[Filter]) -> Value {
    let scoped: Vec<Filter> = match facet.scope {
        FacetScope::AllFilters => active.to_vec(),
        // Reject filters stay active in every scope; only the facet's own
        // positive filter is lifted.
        FacetScope::ExcludeFieldFilter => active
            .iter()
            .filter(|filter| filter.reject || filter.field != facet.field)
            .cloned()
            .collect(),
    };
    let scope_filter =
        filters::filter_expression(&scoped).unwrap_or_else(|| json!({ "match_all": {} }));

    let mut terms = Map::new();
    terms.insert("field".to_string(), json!(facet.field));
    terms.insert("size".to_string(), json!(MAX_OBSERVED_OPTIONS));

    json!({
        "filter": scope_filter,
        "aggregations": {
            "filtered_aggregations": { "terms": terms },
            "missing_value": { "missing": { "field": facet.field } },
        }
    })
}
