//! Score-shaping stages: static format boosts and bounded popularity
//! blending. Both multiply the wrapped expression's score, so their
//! relative order does not change ranking.

use serde_json::{json, Value};

use crate::StageContext;

pub fn apply_format_boosts(ctx: &StageContext, expression: Value) -> Value {
    if ctx.builder.format_boosts.is_empty() {
        return expression;
    }
    // BTreeMap iteration keeps the emitted function order stable.
    let functions: Vec<Value> = ctx
        .builder
        .format_boosts
        .iter()
        .map(|(format, weight)| {
            json!({
                "filter": { "term": { "format": format } },
                "weight": weight,
            })
        })
        .collect();
    json!({
        "function_score": {
            "boost_mode": "multiply",
            "query": expression,
            "functions": functions,
        }
    })
}

pub fn apply_popularity(ctx: &StageContext, expression: Value) -> Value {
    if ctx.params.debug.disable_popularity {
        return expression;
    }
    // log1p keeps the blend monotonic; max_boost caps it so popularity
    // cannot drown out text relevance.
    json!({
        "function_score": {
            "boost_mode": "multiply",
            "max_boost": ctx.builder.popularity_max_boost,
            "query": expression,
            "functions": [{
                "field_value_factor": {
                    "field": "popularity",
                    "modifier": "log1p",
                    "factor": ctx.builder.popularity_factor,
                    "missing": 0,
                }
            }],
        }
    })
}
