//! Curated exact-query promotions and exclusions, applied as the final
//! scoring stage so pinned documents outrank anything organic.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use trawl_core::config::BestBetConfig;

use crate::StageContext;

// Pinned weights descend from here by configured position, far above any
// organic relevance score.
const PINNED_WEIGHT_BASE: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct BestBet {
    pub pinned: Vec<String>,
    pub excluded: Vec<String>,
}

/// Startup-loaded lookup table keyed by the normalised query string.
#[derive(Debug, Clone, Default)]
pub struct BestBetsIndex {
    entries: BTreeMap<String, BestBet>,
}

impl BestBetsIndex {
    pub fn from_config(entries: &[BestBetConfig]) -> Self {
        let mut index = BTreeMap::new();
        for entry in entries {
            index.insert(
                lookup_key(&entry.query),
                BestBet {
                    pinned: entry.pinned.clone(),
                    excluded: entry.excluded.clone(),
                },
            );
        }
        BestBetsIndex { entries: index }
    }

    /// Matches on the trimmed, lowercased query text; anything less exact
    /// is no match.
    pub fn lookup(&self, query: &str) -> Option<&BestBet> {
        self.entries.get(&lookup_key(query))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn apply(ctx: &StageContext, expression: Value) -> Value {
    if ctx.params.debug.disable_best_bets {
        return expression;
    }
    let Some(query) = ctx.params.query.as_deref() else {
        return expression;
    };
    let Some(bet) = ctx.builder.best_bets.lookup(query) else {
        return expression;
    };
    if bet.pinned.is_empty() && bet.excluded.is_empty() {
        return expression;
    }
    debug!(
        pinned = bet.pinned.len(),
        excluded = bet.excluded.len(),
        "applying best bet"
    );

    let mut should = vec![expression];
    if !bet.pinned.is_empty() {
        should.push(pinned_expression(&bet.pinned));
    }

    let mut body = Map::new();
    body.insert("should".to_string(), Value::Array(should));
    if !bet.excluded.is_empty() {
        body.insert(
            "must_not".to_string(),
            json!({ "ids": { "values": bet.excluded } }),
        );
    }
    json!({ "bool": body })
}

// Replace-mode scoring: each pinned id scores exactly its position weight,
// so configured order survives any organic score.
fn pinned_expression(pinned: &[String]) -> Value {
    let functions: Vec<Value> = pinned
        .iter()
        .enumerate()
        .map(|(position, id)| {
            json!({
                "filter": { "ids": { "values": [id] } },
                "weight": PINNED_WEIGHT_BASE - position as u64,
            })
        })
        .collect();
    json!({
        "function_score": {
            "boost_mode": "replace",
            "score_mode": "max",
            "query": { "ids": { "values": pinned } },
            "functions": functions,
        }
    })
}
