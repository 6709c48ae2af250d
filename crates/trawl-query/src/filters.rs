//! Filter expressions: value/missing/range selection, reject handling,
//! and the withdrawn-content exclusion.

use serde_json::{json, Map, Value};

use trawl_core::types::{Filter, FilterValues};

/// Combined expression for the given filters, used both as the hit
/// post-filter and inside facet scopes. `None` when nothing filters.
pub fn filter_expression(filters: &[Filter]) -> Option<Value> {
    if filters.is_empty() {
        return None;
    }
    let mut must: Vec<Value> = Vec::new();
    let mut must_not: Vec<Value> = Vec::new();
    for filter in filters {
        let expression = single_filter(filter);
        if filter.reject {
            must_not.push(expression);
        } else {
            must.push(expression);
        }
    }
    if must.len() == 1 && must_not.is_empty() {
        return must.pop();
    }
    let mut body = Map::new();
    if !must.is_empty() {
        body.insert("must".to_string(), Value::Array(must));
    }
    if !must_not.is_empty() {
        body.insert("must_not".to_string(), Value::Array(must_not));
    }
    Some(json!({ "bool": body }))
}

fn single_filter(filter: &Filter) -> Value {
    match &filter.values {
        FilterValues::Any(_) => {
            let values = filter.allowed_values();
            let terms = (!values.is_empty()).then(|| {
                let mut by_field = Map::new();
                by_field.insert(filter.field.clone(), json!(values));
                json!({ "terms": by_field })
            });
            let missing = filter
                .wants_missing()
                .then(|| json!({ "missing": { "field": filter.field } }));
            match (terms, missing) {
                (Some(terms), None) => terms,
                (None, Some(missing)) => missing,
                (Some(terms), Some(missing)) => {
                    json!({ "bool": { "should": [terms, missing] } })
                }
                (None, None) => {
                    // An empty value list matches nothing.
                    let mut by_field = Map::new();
                    by_field.insert(filter.field.clone(), json!([]));
                    json!({ "terms": by_field })
                }
            }
        }
        FilterValues::Between { from, to } => {
            let mut bounds = Map::new();
            if let Some(from) = from {
                bounds.insert("from".to_string(), json!(from));
            }
            if let Some(to) = to {
                bounds.insert("to".to_string(), json!(to));
            }
            let mut by_field = Map::new();
            by_field.insert(filter.field.clone(), Value::Object(bounds));
            json!({ "range": by_field })
        }
    }
}

/// Withdrawn content is excluded at query level so hit counts and
/// aggregations agree, unless the debug flag lifts the exclusion.
pub fn exclude_withdrawn(expression: Value, include_withdrawn: bool) -> Value {
    if include_withdrawn {
        return expression;
    }
    json!({
        "bool": {
            "must": expression,
            "must_not": { "term": { "is_withdrawn": true } },
        }
    })
}
