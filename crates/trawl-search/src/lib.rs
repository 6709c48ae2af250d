//! End-to-end serving flow: validate the request, build the backend
//! payload, execute it, and present the response. Collaborators arrive
//! through the `trawl_core::traits` seams, so the whole flow runs against
//! fakes in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use trawl_core::config::SearchConfig;
use trawl_core::document::Document;
use trawl_core::error::{Error, Result};
use trawl_core::traits::{ExampleFetcher, SearchClient};
use trawl_core::types::SearchParameters;
use trawl_presenters::{
    CorrectionBlocklist, FacetCalculator, FacetResult, ResultPresenter, SpellCheckPresenter,
    SuggestionMode,
};
use trawl_query::QueryBuilder;
use trawl_registry::Registries;
use trawl_schema::CombinedSchema;

/// Everything a front door needs to render one results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub total: u64,
    pub results: Vec<Document>,
    pub facets: BTreeMap<String, FacetResult>,
    pub suggested_queries: Vec<String>,
}

pub struct SearchService {
    config: SearchConfig,
    schema: CombinedSchema,
    builder: QueryBuilder,
    client: Arc<dyn SearchClient>,
    registries: Arc<Registries>,
    example_fetcher: Arc<dyn ExampleFetcher>,
}

impl SearchService {
    pub fn new(
        config: SearchConfig,
        schema: CombinedSchema,
        client: Arc<dyn SearchClient>,
        registries: Arc<Registries>,
        example_fetcher: Arc<dyn ExampleFetcher>,
    ) -> Result<Self> {
        let builder = QueryBuilder::new(&config)?;
        Ok(SearchService {
            config,
            schema,
            builder,
            client,
            registries,
            example_fetcher,
        })
    }

    pub fn search(&self, params: &SearchParameters) -> Result<SearchResponse> {
        self.validate(params)?;
        let payload = self.builder.build(params, &self.schema);
        if params.debug.show_query {
            info!(payload = %payload, "backend query");
        }
        let response = self.client.search(&payload)?;
        self.present(params, &response)
    }

    // The front door already clamps pagination; these checks are the
    // contract for callers wired in directly.
    fn validate(&self, params: &SearchParameters) -> Result<()> {
        for filter in &params.filters {
            if !self.schema.is_filterable(&filter.field) {
                return Err(Error::InvalidRequest(format!(
                    "filter field '{}' is not filterable",
                    filter.field
                )));
            }
        }
        for facet in &params.facets {
            if !self.schema.is_filterable(&facet.field) {
                return Err(Error::InvalidRequest(format!(
                    "facet field '{}' is not filterable",
                    facet.field
                )));
            }
        }
        if params.count > self.config.max_count {
            return Err(Error::InvalidRequest(format!(
                "count {} exceeds the maximum of {}",
                params.count, self.config.max_count
            )));
        }
        Ok(())
    }

    fn present(&self, params: &SearchParameters, response: &Value) -> Result<SearchResponse> {
        let total = response["hits"]["total"].as_u64().unwrap_or(0);
        let results = ResultPresenter::present(response, &self.registries)?;
        let facets = FacetCalculator::compute(
            &params.facets,
            &params.filters,
            &response["aggregations"],
            &self.schema,
            self.example_fetcher.as_ref(),
            params.query.as_deref(),
        )?;
        let suggested_queries = self.suggestions(params, response)?;
        debug!(
            total,
            results = results.len(),
            facets = facets.len(),
            "response presented"
        );
        Ok(SearchResponse {
            total,
            results,
            facets,
            suggested_queries,
        })
    }

    fn suggestions(&self, params: &SearchParameters, response: &Value) -> Result<Vec<String>> {
        let Some(query) = params.query.as_deref() else {
            return Ok(Vec::new());
        };
        let blocklist =
            CorrectionBlocklist::build(&self.config.spelling, self.registries.organisations())?;
        if !blocklist.should_correct(query) {
            debug!(query, "correction suppressed");
            return Ok(Vec::new());
        }
        Ok(SpellCheckPresenter::suggested_queries(
            response,
            query,
            SuggestionMode::Best,
        ))
    }
}
