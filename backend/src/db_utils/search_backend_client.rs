//! HTTP client forwarding assembled queries to the search backend.

use common::BackendQuery;

use crate::api::search::search_outcome::{SearchBackend, SearchBackendError, SearchOutcome};


#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpSearchBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), client: reqwest::Client::new() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &BackendQuery) -> Result<SearchOutcome, SearchBackendError> {
        let body = serde_json::to_string(query)
            .map_err(|e| SearchBackendError::Connection(format!("cannot encode query: {}", e)))?;
        let t0 = std::time::Instant::now();

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SearchBackendError::Connection(e.to_string()))?;
        let status = response.status();
        let response_txt = response
            .text()
            .await
            .map_err(|e| SearchBackendError::Connection(e.to_string()))?;

        let dt_ms = t0.elapsed().as_millis();
        tracing::info!("SEARCH RESPONSE: {} len = {} ({}ms)", status, response_txt.len(), dt_ms);
        classify_response(status, response_txt)
    }
}

/// Maps a backend reply to an outcome. 400 means the backend rejected the
/// query; any other failure status or an undecodable body is a connection fault.
pub fn classify_response(
    status: reqwest::StatusCode,
    body: String,
) -> Result<SearchOutcome, SearchBackendError> {
    if status == reqwest::StatusCode::BAD_REQUEST {
        return Err(SearchBackendError::InvalidQuery(body));
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(SearchBackendError::Connection(format!("{}: {}", status, body)));
    }
    serde_json::from_str::<SearchOutcome>(&body)
        .map_err(|e| SearchBackendError::Connection(format!("malformed response: {}", e)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    #[test]
    fn ok_body_is_decoded() {
        let body = r#"{"count": 2, "results": [{"name": "a"}], "facets": {"tags": [{"name": "gis", "count": 2}]}}"#;
        let outcome = classify_response(StatusCode::OK, body.to_string()).unwrap();
        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.results[0]["name"], "a");
        assert_eq!(outcome.facets["tags"][0].name, "gis");
        assert!(!outcome.query_error);
    }

    #[test]
    fn bad_request_is_invalid_query() {
        let err = classify_response(StatusCode::BAD_REQUEST, "unbalanced quote".into()).unwrap_err();
        assert_eq!(err, SearchBackendError::InvalidQuery("unbalanced quote".into()));
    }

    #[test]
    fn server_and_other_client_errors_are_connection_faults() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::SERVICE_UNAVAILABLE, StatusCode::NOT_FOUND] {
            let err = classify_response(status, "down".into()).unwrap_err();
            assert_eq!(err, SearchBackendError::Connection(format!("{}: down", status)));
        }
    }

    #[test]
    fn malformed_body_is_connection_fault() {
        let err = classify_response(StatusCode::OK, "<html>".into()).unwrap_err();
        assert!(matches!(err, SearchBackendError::Connection(ref msg) if msg.starts_with("malformed response")));
    }
}
