//! HTTP access to the HEMIS REST API.
//!
//! Fetch helpers return `Option<Value>`: transport failures, non-2xx
//! statuses, and undecodable bodies all collapse to `None`. Callers render
//! a fixed unavailable-message instead of propagating the cause.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::ApiResult;

/// Per-request deadline covering connect, send, and body read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin reqwest wrapper bound to one HEMIS base URL.
#[derive(Debug, Clone)]
pub struct HemisClient {
    base_url: String,
    http: reqwest::Client,
}

impl HemisClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint, optionally authenticated with a bearer token.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Option<Value> {
        let mut request = self.http.get(self.url(endpoint));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.execute(endpoint, request).await
    }

    /// POST a JSON body, unauthenticated (used for `auth/login`).
    pub async fn post_json(&self, endpoint: &str, body: &Value) -> Option<Value> {
        let request = self.http.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn execute(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Option<Value> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(endpoint, %err, "HEMIS request failed");
                return None;
            }
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => {
                debug!(endpoint, %err, "HEMIS returned an error status");
                return None;
            }
        };
        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(endpoint, %err, "HEMIS response was not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_passes_query_and_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/education/schedule")
                    .query_param("week", "12")
                    .header("authorization", "Bearer tok-1");
                then.status(200)
                    .json_body(serde_json::json!({ "success": true, "data": [] }));
            })
            .await;

        let client = HemisClient::new(server.base_url()).unwrap();
        let value = client
            .get(
                "education/schedule",
                &[("week", "12".to_string())],
                Some("tok-1"),
            )
            .await
            .unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_error_status_collapses_to_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/account/me");
                then.status(401);
            })
            .await;

        let client = HemisClient::new(server.base_url()).unwrap();
        assert!(client.get("account/me", &[], Some("stale")).await.is_none());
    }

    #[tokio::test]
    async fn test_non_json_body_collapses_to_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/account/me");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = HemisClient::new(server.base_url()).unwrap();
        assert!(client.get("account/me", &[], None).await.is_none());
    }

    #[test]
    fn test_url_joining_tolerates_slashes() {
        let client = HemisClient::new("https://h.example/rest/v1/").unwrap();
        assert_eq!(client.url("/account/me"), "https://h.example/rest/v1/account/me");
        assert_eq!(client.url("account/me"), "https://h.example/rest/v1/account/me");
    }
}
