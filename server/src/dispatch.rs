//! Uniform tool execution pipeline.
//!
//! Every tool call runs the same three steps: resolve a token when the
//! tool is protected, issue one GET against the tool's endpoint, and
//! format the payload. Failures never become protocol errors; they become
//! fixed report strings the model can read.

use hemis_api::{document, HemisClient, TokenCache};
use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::{ToolArgs, ToolEntry};

/// Returned by every protected tool when no token can be resolved.
pub const AUTH_UNAVAILABLE: &str =
    "Unable to authenticate with HEMIS. Please check your credentials.";

pub struct Dispatcher {
    client: HemisClient,
    tokens: TokenCache,
}

impl Dispatcher {
    pub fn new(client: HemisClient, tokens: TokenCache) -> Self {
        Self { client, tokens }
    }

    pub async fn dispatch(&self, entry: &ToolEntry, args: &ToolArgs) -> String {
        let token = if entry.requires_auth {
            match self.tokens.get_valid_token().await {
                Some(token) => Some(token),
                None => {
                    warn!(tool = entry.name, "No HEMIS token available");
                    return AUTH_UNAVAILABLE.to_string();
                }
            }
        } else {
            None
        };

        let query = args.query(entry);
        let payload = self
            .client
            .get(entry.endpoint, &query, token.as_deref())
            .await;

        match payload {
            Some(envelope) if document::success(&envelope) => {
                debug!(tool = entry.name, "Formatting report");
                let data = envelope.get("data").unwrap_or(&Value::Null);
                (entry.format)(data, args)
            }
            _ => {
                debug!(tool = entry.name, "Backend yielded no usable payload");
                entry.empty_message.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use async_trait::async_trait;
    use chrono::Duration;
    use hemis_api::{Token, TokenStore};
    use httpmock::prelude::*;

    struct NoStore;

    #[async_trait]
    impl TokenStore for NoStore {
        async fn load(&self) -> Option<Token> {
            None
        }
        async fn save(&self, _token: &Token) {}
    }

    fn dispatcher(server: &MockServer, credentials: bool) -> Dispatcher {
        let client = HemisClient::new(server.base_url()).unwrap();
        let tokens = TokenCache::new(
            client.clone(),
            Box::new(NoStore),
            credentials.then(|| ("student1".to_string(), "secret".to_string())),
            Duration::days(7),
        );
        Dispatcher::new(client, tokens)
    }

    fn decoded(name: &str, args: Value) -> (&'static ToolEntry, ToolArgs) {
        let entry = registry::find(name).unwrap();
        let map = match args {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let args = ToolArgs::decode(entry, Some(&map)).unwrap();
        (entry, args)
    }

    #[tokio::test]
    async fn test_protected_tool_without_credentials_makes_no_request() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let dispatcher = dispatcher(&server, false);
        let (entry, args) = decoded("get_student_profile", serde_json::json!({}));
        assert_eq!(dispatcher.dispatch(entry, &args).await, AUTH_UNAVAILABLE);
        any.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_yields_fixed_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "tok" }
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/account/me");
                then.status(200)
                    .json_body(serde_json::json!({ "success": false }));
            })
            .await;

        let dispatcher = dispatcher(&server, true);
        let (entry, args) = decoded("get_student_profile", serde_json::json!({}));
        assert_eq!(
            dispatcher.dispatch(entry, &args).await,
            "Unable to fetch student profile information."
        );
    }

    #[tokio::test]
    async fn test_public_tool_needs_no_token() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/public/universities")
                    .query_param("l", "en-US");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": [
                        { "name": "Tashkent University", "university_type": "State" }
                    ]
                }));
            })
            .await;

        let dispatcher = dispatcher(&server, false);
        let (entry, args) = decoded("get_universities", serde_json::json!({}));
        let report = dispatcher.dispatch(entry, &args).await;
        assert!(report.contains("Tashkent University"));
        login.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_protected_tool_carries_token_and_query() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "tok-9" }
                }));
            })
            .await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/education/subject-list")
                    .query_param("l", "uz-UZ")
                    .query_param("semester", "14")
                    .header("authorization", "Bearer tok-9");
                then.status(200)
                    .json_body(serde_json::json!({ "success": true, "data": [] }));
            })
            .await;

        let dispatcher = dispatcher(&server, true);
        let (entry, args) = decoded(
            "get_student_subjects",
            serde_json::json!({ "semester": 14, "language": "uz-UZ" }),
        );
        let report = dispatcher.dispatch(entry, &args).await;
        assert!(report.contains("No subjects found"));
        fetch.assert_hits_async(1).await;
    }
}
