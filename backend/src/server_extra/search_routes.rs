//! HTTP handlers for search pages, search plans and navigation links.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{RawQuery, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use common::{FacetCatalog, LinkBuilder, NavigationDelta, ParamMultiMap, SearchParamError, SearchSettings};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::search::search_outcome::SearchBackend;
use crate::api::search::search_plan::{build_search_plan, run_search};


pub struct AppState<B> {
    pub settings: SearchSettings,
    pub catalog: Arc<FacetCatalog>,
    pub backend: Arc<B>,
}

impl<B> AppState<B> {
    pub fn new(settings: SearchSettings, catalog: FacetCatalog, backend: B) -> Self {
        Self { settings, catalog: Arc::new(catalog), backend: Arc::new(backend) }
    }
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            catalog: self.catalog.clone(),
            backend: self.backend.clone(),
        }
    }
}

fn bad_request(e: SearchParamError) -> Response {
    tracing::warn!("search: rejected request: {}", e);
    (StatusCode::BAD_REQUEST, Body::from(e.to_string())).into_response()
}

/// The request as it would be linked: bare path without parameters.
fn request_url(path: &str, params: &ParamMultiMap) -> String {
    LinkBuilder::new(path, params).current()
}

pub async fn search_page<B: SearchBackend + 'static>(
    State(state): State<AppState<B>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Response {
    let params = ParamMultiMap::decode(query.as_deref().unwrap_or_default());
    info!("Search: {}", request_url(uri.path(), &params));
    let plan = match build_search_plan(uri.path(), &params, &state.settings, &state.catalog) {
        Ok(plan) => plan,
        Err(e) => return bad_request(e),
    };
    let page = run_search(state.backend.as_ref(), uri.path(), &params, plan).await;
    Json(page).into_response()
}

/// The assembled backend input, without running the search.
pub async fn search_plan<B: SearchBackend + 'static>(
    State(state): State<AppState<B>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Response {
    let params = ParamMultiMap::decode(query.as_deref().unwrap_or_default());
    let base_path = uri.path().strip_suffix("/_plan").unwrap_or(uri.path());
    match build_search_plan(base_path, &params, &state.settings, &state.catalog) {
        Ok(plan) => Json(plan).into_response(),
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRequest {
    pub url: String,
    pub delta: NavigationDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
}

pub async fn navigation_link(Json(request): Json<LinkRequest>) -> impl IntoResponse {
    let links = LinkBuilder::from_url(&request.url);
    let url = links.url_for(&links.apply(&request.delta));
    Json(LinkResponse { url })
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_url_without_params_is_bare_path() {
        assert_eq!(request_url("/dataset", &ParamMultiMap::new()), "/dataset");
        assert_eq!(request_url("/dataset", &ParamMultiMap::decode("__cache=1")), "/dataset");
        assert_eq!(request_url("/dataset", &ParamMultiMap::decode("q=a+b&tags=x")), "/dataset?q=a+b&tags=x");
    }
}
