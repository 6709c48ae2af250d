use serde_json::Value;

use crate::document::Document;
use crate::error::Result;

/// Executes a built query payload against the search backend and returns
/// the raw response. Backend failures surface as `BackendUnavailable` and
/// are propagated unmodified.
pub trait SearchClient: Send + Sync {
    fn search(&self, payload: &Value) -> Result<Value>;
}

/// Fetches entity documents for registry population.
pub trait DocumentSource: Send + Sync {
    fn documents_by_format(&self, format: &str, fields: &[String]) -> Result<Vec<Document>>;
}

/// Runs the small per-option sub-queries that attach example documents to
/// facet options. `query` is set when examples are scoped to the current
/// search terms.
pub trait ExampleFetcher: Send + Sync {
    fn fetch(
        &self,
        field: &str,
        value: &str,
        count: usize,
        fields: &[String],
        query: Option<&str>,
    ) -> Result<Vec<Document>>;
}
