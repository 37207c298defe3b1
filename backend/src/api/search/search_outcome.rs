//! Search backend seam and degradation of its failures.

use common::{BackendQuery, FacetMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchOutcome {
    pub count: u64,
    pub results: Vec<serde_json::Value>,
    pub facets: IndexMap<String, Vec<FacetCount>>,
    pub query_error: bool,
}

impl SearchOutcome {
    /// Empty outcome with every requested facet present and empty.
    pub fn empty(facets: &FacetMap) -> Self {
        Self {
            facets: facets.keys().map(|field| (field.clone(), Vec::new())).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchBackendError {
    /// The backend rejected the query itself.
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Search backend unavailable: {0}")]
    Connection(String),
}

/// External search backend. Retries, if any, are its own business.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        query: &BackendQuery,
    ) -> impl Future<Output = Result<SearchOutcome, SearchBackendError>> + Send;
}

/// Turns a backend failure into an empty outcome the caller can still render.
pub fn settle_outcome(
    result: Result<SearchOutcome, SearchBackendError>,
    facets: &FacetMap,
) -> SearchOutcome {
    match result {
        Ok(mut outcome) => {
            for field in facets.keys() {
                outcome.facets.entry(field.clone()).or_default();
            }
            outcome
        }
        Err(SearchBackendError::InvalidQuery(message)) => {
            tracing::info!("search: invalid query: {}", message);
            SearchOutcome { query_error: true, ..SearchOutcome::empty(facets) }
        }
        Err(e @ SearchBackendError::Connection(_)) => {
            tracing::error!("search: backend failed: {:#?}", e);
            SearchOutcome::empty(facets)
        }
    }
}
