//! Builds backend query payloads from validated search parameters.
//!
//! The relevance side is an explicit ordered pipeline: a base expression
//! is folded through core matching, format boosts, popularity blending
//! and best bets, each stage a pure function over the expression tree.
//! Filters, sort, pagination and facet aggregations are assembled around
//! the folded expression.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use trawl_core::config::SearchConfig;
use trawl_core::error::Result;
use trawl_core::types::{SearchParameters, WeightingScheme};
use trawl_schema::{CombinedSchema, FieldType};

pub mod aggregations;
pub mod best_bets;
pub mod filters;
pub mod matching;
pub mod scoring;

pub use best_bets::{BestBet, BestBetsIndex};

type Stage = fn(&StageContext, Value) -> Value;

/// Scoring stages in application order. A similarity-seed request skips
/// the pipeline entirely.
const STAGES: &[(&str, Stage)] = &[
    ("core_match", matching::apply),
    ("format_boosts", scoring::apply_format_boosts),
    ("popularity", scoring::apply_popularity),
    ("best_bets", best_bets::apply),
];

/// Read-only inputs shared by every pipeline stage.
pub struct StageContext<'a> {
    pub(crate) builder: &'a QueryBuilder,
    pub(crate) params: &'a SearchParameters,
    pub(crate) schema: &'a CombinedSchema,
}

pub struct QueryBuilder {
    pub(crate) content_indexes: Vec<String>,
    pub(crate) default_return_fields: Vec<String>,
    pub(crate) default_weighting: WeightingScheme,
    pub(crate) minimum_should_match: String,
    pub(crate) popularity_factor: f64,
    pub(crate) popularity_max_boost: f64,
    pub(crate) format_boosts: BTreeMap<String, f64>,
    pub(crate) best_bets: BestBetsIndex,
}

impl QueryBuilder {
    /// Fails only on configuration faults, so request handling never has
    /// to re-validate the weighting scheme.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let default_weighting = config.weighting_scheme()?;
        Ok(QueryBuilder {
            content_indexes: config.content_indexes.clone(),
            default_return_fields: config.default_return_fields.clone(),
            default_weighting,
            minimum_should_match: config.query.minimum_should_match.clone(),
            popularity_factor: config.query.popularity_factor,
            popularity_max_boost: config.query.popularity_max_boost,
            format_boosts: config.boosts.format.clone(),
            best_bets: BestBetsIndex::from_config(&config.best_bets),
        })
    }

    /// Builds the full backend payload. Pure: identical inputs yield a
    /// structurally identical tree.
    pub fn build(&self, params: &SearchParameters, schema: &CombinedSchema) -> Value {
        let mut payload = Map::new();
        payload.insert("from".to_string(), json!(params.start));
        payload.insert("size".to_string(), json!(params.count));
        payload.insert("fields".to_string(), json!(self.return_fields(params)));
        payload.insert("query".to_string(), self.query_expression(params, schema));
        if let Some(post_filter) = filters::filter_expression(&params.filters) {
            payload.insert("post_filter".to_string(), post_filter);
        }
        if let Some(sort) = sort_expression(params, schema) {
            payload.insert("sort".to_string(), sort);
        }
        if !params.facets.is_empty() {
            payload.insert(
                "aggregations".to_string(),
                aggregations::expression(&params.facets, &params.filters),
            );
        }
        if let Some(suggest) = suggest_expression(params) {
            payload.insert("suggest".to_string(), suggest);
        }
        if params.debug.explain {
            payload.insert("explain".to_string(), Value::Bool(true));
        }
        Value::Object(payload)
    }

    fn return_fields(&self, params: &SearchParameters) -> Vec<String> {
        if params.return_fields.is_empty() {
            self.default_return_fields.clone()
        } else {
            params.return_fields.clone()
        }
    }

    fn query_expression(&self, params: &SearchParameters, schema: &CombinedSchema) -> Value {
        if let Some(seed) = params.similar_to.as_deref() {
            debug!(seed, "building similarity query");
            return filters::exclude_withdrawn(
                self.similarity_expression(seed),
                params.debug.include_withdrawn,
            );
        }
        let ctx = StageContext {
            builder: self,
            params,
            schema,
        };
        let mut expression = json!({ "match_all": {} });
        for &(name, stage) in STAGES {
            expression = stage(&ctx, expression);
            debug!(stage = name, "applied scoring stage");
        }
        filters::exclude_withdrawn(expression, params.debug.include_withdrawn)
    }

    fn similarity_expression(&self, seed: &str) -> Value {
        let docs: Vec<Value> = self
            .content_indexes
            .iter()
            .map(|index| json!({ "_id": seed, "_index": index }))
            .collect();
        json!({ "more_like_this": { "docs": docs } })
    }
}

fn sort_expression(params: &SearchParameters, schema: &CombinedSchema) -> Option<Value> {
    let order = params.order.as_ref()?;
    // Sortable text fields order on their raw subfield.
    let field = match schema.field(&order.field).map(|def| def.field_type) {
        Some(FieldType::SearchableSortableText) => format!("{}.sort", order.field),
        _ => order.field.clone(),
    };
    let mut spec = Map::new();
    spec.insert(field, json!({ "order": order.direction.label() }));
    Some(Value::Array(vec![Value::Object(spec)]))
}

fn suggest_expression(params: &SearchParameters) -> Option<Value> {
    let query = params.query.as_deref()?;
    Some(json!({
        "text": query,
        "spelling_suggestions": { "phrase": { "field": "spelling_text", "size": 1 } },
    }))
}
