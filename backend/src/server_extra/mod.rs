//! Router for the search surface.

pub mod search_routes;

use axum::{Router, routing::{get, post}};

use crate::api::search::search_outcome::SearchBackend;
use search_routes::{AppState, navigation_link, search_page, search_plan};


pub fn router<B: SearchBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/dataset", get(search_page::<B>))
        .route("/dataset/_plan", get(search_plan::<B>))
        .route("/_links", post(navigation_link))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::search::search_outcome::{FacetCount, SearchBackendError, SearchOutcome};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::{BackendQuery, FacetCatalog, SearchSettings};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    struct EchoBackend;

    impl SearchBackend for EchoBackend {
        async fn search(&self, query: &BackendQuery) -> Result<SearchOutcome, SearchBackendError> {
            if query.q.contains('"') {
                return Err(SearchBackendError::InvalidQuery("unbalanced quote".into()));
            }
            let mut outcome = SearchOutcome { count: 3, ..Default::default() };
            outcome.results.push(serde_json::json!({ "fq": query.fq }));
            outcome.facets.insert("tags".into(), vec![FacetCount { name: "gis".into(), count: 3 }]);
            Ok(outcome)
        }
    }

    fn app() -> Router {
        router(AppState::new(SearchSettings::default(), FacetCatalog::new(), EchoBackend))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn search_page_runs_backend() {
        let (status, json) = get_json(app(), "/dataset?q=lakes&tags=water&page=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"]["count"], 3);
        assert_eq!(json["outcome"]["results"][0]["fq"], "tags:\"water\" +dataset_type:dataset");
        assert_eq!(json["facets"]["tags"]["items"][0]["url"], "/dataset?q=lakes&tags=water&page=1&tags=gis");
        assert_eq!(json["pager"]["next_url"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn invalid_query_degrades() {
        let (status, json) = get_json(app(), "/dataset?q=%22oops").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"]["query_error"], true);
        assert_eq!(json["outcome"]["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn bad_facet_limit_is_rejected() {
        let response = app()
            .oneshot(Request::builder().uri("/dataset?_tags_limit=x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Parameter \"_tags_limit\" is not an integer");
    }

    #[tokio::test]
    async fn plan_uses_search_path_for_links() {
        let (status, json) = get_json(app(), "/dataset/_plan?tags=a&tags=b&ext_x=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["backend_query"]["extras"]["ext_x"], "1");
        assert_eq!(json["active_filters"][0]["remove_url"], "/dataset?tags=b&ext_x=1");
    }

    #[tokio::test]
    async fn navigation_link_applies_delta() {
        let body = serde_json::json!({
            "url": "/dataset?page=3&tags=a",
            "delta": { "SetSort": [{ "field": "name", "direction": "asc" }] }
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/_links")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["url"], "/dataset?tags=a&sort=name+asc");
    }
}
