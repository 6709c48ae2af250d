//! Domain types shared by the query, presenter, and serving crates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Default page size when the front door supplies none.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which core text-matching strategy scores a request.
///
/// Exactly one runs per request. The configured default can be overridden
/// per request so both sides of an A/B comparison stay reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingScheme {
    /// Field-weighted exact/phrase/partial matching with fixed weights.
    Legacy,
    /// Normalized field weights with a dis-max combination.
    Normalized,
}

impl FromStr for WeightingScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(WeightingScheme::Legacy),
            "normalized" => Ok(WeightingScheme::Normalized),
            other => Err(Error::InvalidConfig(format!(
                "unknown weighting scheme {other:?} (expected \"legacy\" or \"normalized\")"
            ))),
        }
    }
}

/// Diagnostic switches carried on a request. All default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Ask the backend to attach per-hit score explanations.
    pub explain: bool,
    /// Lift the default exclusion of withdrawn content.
    pub include_withdrawn: bool,
    /// Skip the popularity blending stage.
    pub disable_popularity: bool,
    /// Skip best-bet pinning and exclusion.
    pub disable_best_bets: bool,
    /// Log the built query expression before sending it.
    pub show_query: bool,
}

/// One allowed value inside a set filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Documents carrying this exact value.
    Value(String),
    /// Documents with no value for the field at all.
    Missing,
}

/// The value side of a filter: either a value set or a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValues {
    Any(Vec<FilterValue>),
    Between {
        from: Option<String>,
        to: Option<String>,
    },
}

/// A validated filter on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub values: FilterValues,
    /// Inverts the filter: matching documents are dropped instead of kept.
    #[serde(default)]
    pub reject: bool,
}

impl Filter {
    pub fn any<I, S>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter {
            field: field.to_string(),
            values: FilterValues::Any(
                values
                    .into_iter()
                    .map(|v| FilterValue::Value(v.into()))
                    .collect(),
            ),
            reject: false,
        }
    }

    pub fn missing(field: &str) -> Self {
        Filter {
            field: field.to_string(),
            values: FilterValues::Any(vec![FilterValue::Missing]),
            reject: false,
        }
    }

    pub fn between(field: &str, from: Option<&str>, to: Option<&str>) -> Self {
        Filter {
            field: field.to_string(),
            values: FilterValues::Between {
                from: from.map(str::to_string),
                to: to.map(str::to_string),
            },
            reject: false,
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// The explicit values this filter allows, ignoring the missing marker.
    pub fn allowed_values(&self) -> Vec<&str> {
        match &self.values {
            FilterValues::Any(values) => values
                .iter()
                .filter_map(|v| match v {
                    FilterValue::Value(s) => Some(s.as_str()),
                    FilterValue::Missing => None,
                })
                .collect(),
            FilterValues::Between { .. } => Vec::new(),
        }
    }

    /// Whether the filter selects documents lacking the field entirely.
    pub fn wants_missing(&self) -> bool {
        match &self.values {
            FilterValues::Any(values) => values.iter().any(|v| *v == FilterValue::Missing),
            FilterValues::Between { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Explicit result ordering; absent means relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: &str) -> Self {
        SortOrder {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        SortOrder {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Whether a facet's own active filter takes part in its option counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetScope {
    /// Count options against every active filter except one on this field,
    /// so a user already filtering here still sees all options.
    ExcludeFieldFilter,
    /// Count options with every active filter applied, own field included.
    AllFilters,
}

impl FacetScope {
    pub fn label(self) -> &'static str {
        match self {
            FacetScope::ExcludeFieldFilter => "exclude_field_filter",
            FacetScope::AllFilters => "all_filters",
        }
    }
}

/// Sort keys available for facet options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetOrderKey {
    /// Options the user has already filtered on.
    FilteredFirst,
    /// Document count for the option.
    Count,
    /// The raw option value (an object value compares by its title).
    Value,
    Slug,
    /// Case-insensitive title comparison.
    Title,
    Link,
}

/// One step of a facet's composite ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOrder {
    pub key: FacetOrderKey,
    pub direction: SortDirection,
}

impl FacetOrder {
    pub fn asc(key: FacetOrderKey) -> Self {
        FacetOrder {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: FacetOrderKey) -> Self {
        FacetOrder {
            key,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleScope {
    /// Examples drawn from the whole collection.
    Global,
    /// Examples restricted to the current query.
    Query,
}

/// Request to embed example documents under each facet option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSpec {
    pub count: usize,
    pub scope: ExampleScope,
    /// Fields projected into each example document.
    pub fields: Vec<String>,
}

/// A validated facet request for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    pub field: String,
    /// Maximum number of options returned to the client.
    pub requested_count: usize,
    pub scope: FacetScope,
    /// Composite ordering, applied in listed priority. Empty means the
    /// serving default: filtered first, count descending, slug ascending.
    pub order: Vec<FacetOrder>,
    pub examples: Option<ExampleSpec>,
}

impl FacetRequest {
    pub fn new(field: &str, requested_count: usize) -> Self {
        FacetRequest {
            field: field.to_string(),
            requested_count,
            scope: FacetScope::ExcludeFieldFilter,
            order: Vec::new(),
            examples: None,
        }
    }

    pub fn with_scope(mut self, scope: FacetScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_order(mut self, order: Vec<FacetOrder>) -> Self {
        self.order = order;
        self
    }

    pub fn with_examples(mut self, examples: ExampleSpec) -> Self {
        self.examples = Some(examples);
        self
    }
}

/// A fully validated search request.
///
/// Built by the front door; immutable once constructed. `query` and
/// `similar_to` are mutually exclusive (the front door enforces this; when
/// both are set the similarity seed wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Free-text query, if any.
    pub query: Option<String>,
    /// Seed document id for a find-similar request.
    pub similar_to: Option<String>,
    pub filters: Vec<Filter>,
    pub facets: Vec<FacetRequest>,
    pub order: Option<SortOrder>,
    /// Zero-based offset into the result list.
    pub start: usize,
    /// Number of hits requested.
    pub count: usize,
    /// Fields projected into each hit; empty means the configured default.
    pub return_fields: Vec<String>,
    /// Per-request override of the configured core-match strategy.
    pub weighting: Option<WeightingScheme>,
    pub debug: DebugOptions,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters {
            query: None,
            similar_to: None,
            filters: Vec::new(),
            facets: Vec::new(),
            order: None,
            start: 0,
            count: DEFAULT_PAGE_SIZE,
            return_fields: Vec::new(),
            weighting: None,
            debug: DebugOptions::default(),
        }
    }
}

impl SearchParameters {
    pub fn with_query(query: &str) -> Self {
        SearchParameters {
            query: Some(query.to_string()),
            ..SearchParameters::default()
        }
    }

    pub fn with_similar_to(seed_id: &str) -> Self {
        SearchParameters {
            similar_to: Some(seed_id.to_string()),
            ..SearchParameters::default()
        }
    }

    /// The active (non-reject) filter on the given field, if any.
    pub fn filter_on(&self, field: &str) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|f| !f.reject && f.field == field)
    }
}
