//! Typed configuration for the search service.
//!
//! Figment merges `config.toml` + `config.<env>.toml` + `APP_*` env vars,
//! then extracts into [`SearchConfig`]. Validation runs at load time so a
//! bad weighting scheme or page size fails startup, not a request.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;

use crate::error::{Error, Result};
use crate::types::WeightingScheme;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index names queried for content (and used as `more_like_this` targets).
    pub content_indexes: Vec<String>,
    /// Index holding the entity documents registries are populated from.
    pub registry_index: String,
    /// How long registry snapshots stay fresh before a re-fetch.
    pub registry_cache_ttl_seconds: u64,
    pub default_count: usize,
    pub max_count: usize,
    /// Fields returned per hit when the request names none.
    pub default_return_fields: Vec<String>,
    pub query: QueryConfig,
    pub boosts: BoostConfig,
    pub spelling: SpellingConfig,
    pub best_bets: Vec<BestBetConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            content_indexes: vec!["content".to_string()],
            registry_index: "content".to_string(),
            registry_cache_ttl_seconds: 300,
            default_count: 10,
            max_count: 1000,
            default_return_fields: vec![
                "link".to_string(),
                "title".to_string(),
                "description".to_string(),
                "format".to_string(),
                "slug".to_string(),
            ],
            query: QueryConfig::default(),
            boosts: BoostConfig::default(),
            spelling: SpellingConfig::default(),
            best_bets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Default text-matching scheme; requests may override per call.
    pub weighting: String,
    /// Relaxation curve for the loose term clause, in the backend's
    /// `minimum_should_match` notation.
    pub minimum_should_match: String,
    pub popularity_factor: f64,
    /// Cap on the popularity multiplier so popularity never drowns out
    /// text relevance.
    pub popularity_max_boost: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            weighting: "legacy".to_string(),
            minimum_should_match: "2<2 3<3 7<50%".to_string(),
            popularity_factor: 0.5,
            popularity_max_boost: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Static score multipliers keyed by document format.
    pub format: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Words never offered as corrections (product names, jargon).
    pub ignore: Vec<String>,
}

/// A curated override for one exact query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BestBetConfig {
    pub query: String,
    /// Document ids promoted above organic results, best first.
    pub pinned: Vec<String>,
    /// Document ids removed from results entirely.
    pub excluded: Vec<String>,
}

impl SearchConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: SearchConfig = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The configured default weighting scheme.
    pub fn weighting_scheme(&self) -> Result<WeightingScheme> {
        self.query.weighting.parse()
    }

    fn validate(&self) -> Result<()> {
        self.weighting_scheme()?;
        if self.content_indexes.is_empty() {
            return Err(Error::InvalidConfig(
                "content_indexes must name at least one index".to_string(),
            ));
        }
        if self.default_count == 0 {
            return Err(Error::InvalidConfig(
                "default_count must be positive".to_string(),
            ));
        }
        if self.max_count < self.default_count {
            return Err(Error::InvalidConfig(format!(
                "max_count {} is below default_count {}",
                self.max_count, self.default_count
            )));
        }
        if self.registry_cache_ttl_seconds == 0 {
            return Err(Error::InvalidConfig(
                "registry_cache_ttl_seconds must be positive".to_string(),
            ));
        }
        for bet in &self.best_bets {
            if bet.query.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "best_bets entries require a non-empty query".to_string(),
                ));
            }
        }
        Ok(())
    }
}
