use crate::api::params::{
    CohortsParams, FilterFieldsParams, FilterValuesParams, HistoryListParams,
    HistoryStatsParams, NoteTypesParams, QueryParams, SearchParams,
};
use crate::core::auth::AuthHeaders;
use crate::error::ApiError;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("trioexplorer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct SearchClient {
    pub base_url: String,
    headers: AuthHeaders,
    timeout: Duration,
    debug: bool,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, headers: AuthHeaders) -> Self {
        let base_url: String = base_url.into();
        SearchClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // A fresh client per call; nothing is pooled between requests.
    fn http_client(&self) -> Result<Client, ApiError> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ApiError::Unexpected {
                message: format!("Failed to initialize HTTP client: {}", e),
            })
    }

    pub fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let mut request = self.http_client()?.request(method, self.url(path));

        for (name, value) in self.headers.iter() {
            request = request.header(name, value);
        }

        Ok(request)
    }

    /// GET `path` with query parameters and return the decoded JSON body.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        if self.debug {
            log::debug!(">>> GET {}", self.url(path));
            if !params.is_empty() {
                log::debug!("    params: {}", params_for_trace(params));
            }
        }

        let request = self.build_request(Method::GET, path)?.query(params);
        self.execute(request, path).await
    }

    /// POST a JSON body to `path` and return the decoded JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        if self.debug {
            log::debug!(">>> POST {}", self.url(path));
            log::debug!("    json: {}", body);
        }

        let request = self.build_request(Method::POST, path)?.json(body);
        self.execute(request, path).await
    }

    async fn execute(&self, request: RequestBuilder, endpoint: &str) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e, endpoint))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e, endpoint))?;

        if self.debug {
            log::debug!("<<< {} ({} bytes)", status, body.len());
        }

        if let Some(err) = classify_status(status, &body, endpoint) {
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Unexpected {
            message: format!("Invalid JSON in response from {}: {}", endpoint, e),
        })
    }

    // Timeout is checked before connect: a connect timeout sets both flags.
    fn classify_transport_error(&self, err: reqwest::Error, endpoint: &str) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                timeout_secs: self.timeout.as_secs_f64(),
                endpoint: endpoint.to_string(),
            }
        } else if err.is_connect() {
            ApiError::Connect {
                base_url: self.base_url.clone(),
            }
        } else if err.is_builder() {
            ApiError::Unexpected {
                message: err.to_string(),
            }
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Value, ApiError> {
        self.get("/search", &params.query_pairs()).await
    }

    pub async fn list_indexed_cohorts(&self, params: &CohortsParams) -> Result<Value, ApiError> {
        self.get("/cohorts/indexed", &params.query_pairs()).await
    }

    pub async fn list_note_types(&self, params: &NoteTypesParams) -> Result<Value, ApiError> {
        self.get("/note-types", &params.query_pairs()).await
    }

    pub async fn list_search_history(&self, params: &HistoryListParams) -> Result<Value, ApiError> {
        self.get("/search-history", &params.query_pairs()).await
    }

    pub async fn get_search_history(&self, history_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/search-history/{}", history_id), &[])
            .await
    }

    pub async fn search_history_stats(
        &self,
        params: &HistoryStatsParams,
    ) -> Result<Value, ApiError> {
        self.get("/search-history/stats/summary", &params.query_pairs())
            .await
    }

    pub async fn list_filter_fields(
        &self,
        namespace: &str,
        params: &FilterFieldsParams,
    ) -> Result<Value, ApiError> {
        let path = format!("/namespaces/{}/filter-fields", namespace);
        self.get(&path, &params.query_pairs()).await
    }

    pub async fn list_filter_values(
        &self,
        namespace: &str,
        field: &str,
        params: &FilterValuesParams,
    ) -> Result<Value, ApiError> {
        let path = format!("/namespaces/{}/filter-values/{}", namespace, field);
        self.get(&path, &params.query_pairs()).await
    }
}

/// Map an HTTP status to an error, or `None` for a success status.
///
/// 401 and 403 get dedicated variants. Any other status of 400 or above
/// becomes [`ApiError::Http`] carrying the body's `detail` field when the
/// body is a JSON object that has one, and the raw body text otherwise.
pub fn classify_status(status: u16, body: &str, endpoint: &str) -> Option<ApiError> {
    match status {
        401 => Some(ApiError::Unauthorized {
            endpoint: endpoint.to_string(),
        }),
        403 => Some(ApiError::Forbidden {
            endpoint: endpoint.to_string(),
        }),
        s if s >= 400 => Some(ApiError::Http {
            status: s,
            endpoint: endpoint.to_string(),
            detail: error_detail(body),
        }),
        _ => None,
    }
}

fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

fn params_for_trace(params: &[(&str, String)]) -> Value {
    let map: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key(key: &str) -> SearchClient {
        SearchClient::new("http://example.test", AuthHeaders::with_api_key(key))
    }

    #[test]
    fn test_defaults() {
        let client = SearchClient::new("http://example.test", AuthHeaders::empty());
        assert_eq!(client.headers, AuthHeaders::empty());
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(!client.debug);
    }

    #[test]
    fn test_builder_settings() {
        let client = client_with_key("key")
            .with_timeout(Duration::from_millis(250))
            .with_debug(true);
        assert_eq!(client.headers, AuthHeaders::with_api_key("key"));
        assert_eq!(client.timeout, Duration::from_millis(250));
        assert!(client.debug);
    }

    #[test]
    fn test_build_request_without_auth() {
        let client = SearchClient::new("http://example.test", AuthHeaders::empty());
        let request = client
            .build_request(Method::GET, "/search")
            .expect("client creation failed")
            .build()
            .expect("Failed to build request");

        assert_eq!(request.url().as_str(), "http://example.test/search");
        assert_eq!(request.method(), Method::GET);
        assert!(request.headers().get("x-api-key").is_none());
    }

    #[test]
    fn test_build_request_with_api_key() {
        let request = client_with_key("test_api_key_123")
            .build_request(Method::GET, "/note-types")
            .expect("client creation failed")
            .build()
            .expect("Failed to build request");

        assert_eq!(
            request
                .headers()
                .get("X-API-Key")
                .and_then(|v| v.to_str().ok()),
            Some("test_api_key_123")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = SearchClient::new("http://example.test/", AuthHeaders::empty());
        assert_eq!(client.base_url, "http://example.test");
    }

    #[test]
    fn test_url_is_plain_concatenation() {
        let client = SearchClient::new("http://example.test/api", AuthHeaders::empty());
        assert_eq!(client.url("/search"), "http://example.test/api/search");
        assert_eq!(client.url("search"), "http://example.test/apisearch");
    }

    #[test]
    fn test_classify_success_statuses() {
        assert!(classify_status(200, "{}", "/search").is_none());
        assert!(classify_status(204, "", "/search").is_none());
        assert!(classify_status(302, "", "/search").is_none());
    }

    #[test]
    fn test_classify_auth_statuses() {
        assert!(matches!(
            classify_status(401, r#"{"detail":"bad key"}"#, "/search"),
            Some(ApiError::Unauthorized { .. })
        ));
        assert!(matches!(
            classify_status(403, "", "/search"),
            Some(ApiError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_classify_http_detail_extraction() {
        let err = classify_status(404, r#"{"detail":"Search history not found"}"#, "/x");
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("Error 404: Search history not found")
        );

        let err = classify_status(500, "Internal Server Error", "/x");
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("Error 500: Internal Server Error")
        );

        let err = classify_status(422, r#"{"detail":[{"loc":["query","k"]}]}"#, "/x");
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some(r#"Error 422: [{"loc":["query","k"]}]"#)
        );

        // JSON without a detail field falls back to the raw body
        let err = classify_status(400, r#"{"error":"bad"}"#, "/x");
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some(r#"Error 400: {"error":"bad"}"#)
        );
    }

    #[test]
    fn test_params_for_trace() {
        let params = vec![("k", "10".to_string()), ("query", "fever".to_string())];
        assert_eq!(
            params_for_trace(&params).to_string(),
            r#"{"k":"10","query":"fever"}"#
        );
    }
}
