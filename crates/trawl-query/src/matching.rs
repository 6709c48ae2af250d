//! Core text-matching stage.
//!
//! Two strategies, selected per request with a configured default: the
//! legacy field-weighted matcher and the normalized weighting matcher.
//! Without query text the stage is the identity, leaving the
//! match-everything base expression in place.

use serde_json::{json, Map, Value};

use trawl_core::types::WeightingScheme;
use trawl_schema::CombinedSchema;

use crate::StageContext;

/// Field/weight table for the legacy strategy. The normalized strategy
/// uses the same fields with weights rescaled into a 0-1 band.
const MATCH_FIELDS: [(&str, f64); 4] = [
    ("title", 5.0),
    ("acronym", 5.0),
    ("description", 2.0),
    ("indexable_content", 1.0),
];

const TIE_BREAKER: f64 = 0.2;

pub fn apply(ctx: &StageContext, expression: Value) -> Value {
    let Some(query) = ctx.params.query.as_deref() else {
        return expression;
    };
    let scheme = ctx
        .params
        .weighting
        .unwrap_or(ctx.builder.default_weighting);
    match scheme {
        WeightingScheme::Legacy => {
            legacy(query, ctx.schema, &ctx.builder.minimum_should_match)
        }
        WeightingScheme::Normalized => {
            normalized(query, ctx.schema, &ctx.builder.minimum_should_match)
        }
    }
}

fn legacy(query: &str, schema: &CombinedSchema, minimum_should_match: &str) -> Value {
    let fields = present_fields(schema, 1.0);
    let mut should: Vec<Value> = fields
        .iter()
        .map(|(field, weight)| phrase_clause(field, query, *weight))
        .collect();
    should.push(json!({
        "multi_match": {
            "query": query,
            "operator": "and",
            "fields": weighted_names(&fields),
        }
    }));
    should.push(json!({
        "multi_match": {
            "query": query,
            "minimum_should_match": minimum_should_match,
            "fields": weighted_names(&fields),
        }
    }));
    json!({ "bool": { "should": should } })
}

fn normalized(query: &str, schema: &CombinedSchema, minimum_should_match: &str) -> Value {
    let top_weight = MATCH_FIELDS
        .iter()
        .map(|(_, weight)| *weight)
        .fold(1.0, f64::max);
    let fields = present_fields(schema, top_weight);

    if let Some(phrase) = quoted_phrase(query) {
        let should: Vec<Value> = fields
            .iter()
            .map(|(field, weight)| phrase_clause(field, phrase, *weight))
            .collect();
        return json!({ "bool": { "should": should } });
    }

    json!({
        "dis_max": {
            "tie_breaker": TIE_BREAKER,
            "queries": [
                {
                    "multi_match": {
                        "query": query,
                        "operator": "and",
                        "fields": weighted_names(&fields),
                    }
                },
                {
                    "multi_match": {
                        "query": query,
                        "minimum_should_match": minimum_should_match,
                        "fields": weighted_names(&fields),
                    }
                }
            ]
        }
    })
}

// Fields absent from the combined schema contribute no clause at all.
fn present_fields(schema: &CombinedSchema, scale: f64) -> Vec<(String, f64)> {
    MATCH_FIELDS
        .iter()
        .filter(|(name, _)| schema.field(name).is_some())
        .map(|(name, weight)| ((*name).to_string(), weight / scale))
        .collect()
}

fn weighted_names(fields: &[(String, f64)]) -> Vec<String> {
    fields
        .iter()
        .map(|(name, weight)| format!("{name}^{weight}"))
        .collect()
}

fn phrase_clause(field: &str, query: &str, boost: f64) -> Value {
    let mut inner = Map::new();
    inner.insert("query".to_string(), Value::String(query.to_string()));
    inner.insert("boost".to_string(), json!(boost));
    let mut by_field = Map::new();
    by_field.insert(field.to_string(), Value::Object(inner));
    let mut clause = Map::new();
    clause.insert("match_phrase".to_string(), Value::Object(by_field));
    Value::Object(clause)
}

// A query that is one fully quoted phrase, with the quotes stripped.
fn quoted_phrase(query: &str) -> Option<&str> {
    let inner = query.trim().strip_prefix('"')?.strip_suffix('"')?;
    (!inner.is_empty() && !inner.contains('"')).then_some(inner)
}
