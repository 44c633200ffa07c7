//! OpenAI-compatible completion client.

use std::time::Duration;

use tracing::debug;

use crate::error::{ChatError, ChatResult};
use crate::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ToolDefinition,
};

/// Deadline for one completion; tool-calling turns over large reports
/// can be slow, but a hung completion must not hang the REPL forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1000;

pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> ChatResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ChatError::Llm(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from `OPENAI_API_KEY`, `OPENAI_BASE_URL`, and
    /// `HEMIS_CHAT_MODEL`.
    pub fn from_env() -> ChatResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ChatError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("HEMIS_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, api_key, model)
    }

    /// One completion over the transcript. `tools` is present only on the
    /// first call of a turn; the closing call omits it.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
    ) -> ChatResult<ChatMessage> {
        let tool_choice = tools.as_ref().map(|_| "auto".to_string());
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            tool_choice,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, "Requesting completion");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ChatError::Llm(err.to_string()))?
            .error_for_status()
            .map_err(|err| ChatError::Llm(err.to_string()))?;

        let mut decoded: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ChatError::Llm(err.to_string()))?;

        if decoded.choices.is_empty() {
            return Err(ChatError::Llm("completion returned no choices".to_string()));
        }
        Ok(decoded.choices.remove(0).message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_complete_sends_tools_and_decodes_message() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .body_contains("\"tools\"")
                    .body_contains("\"tool_choice\":\"auto\"");
                then.status(200).json_body(serde_json::json!({
                    "choices": [{
                        "message": { "role": "assistant", "content": "hello" }
                    }]
                }));
            })
            .await;

        let client = LlmClient::new(server.base_url(), "test-key", "test-model").unwrap();
        let tools = vec![crate::protocol::ToolDefinition {
            r#type: "function".to_string(),
            function: crate::protocol::FunctionDefinition {
                name: "get_student_profile".to_string(),
                description: "profile".to_string(),
                parameters: serde_json::json!({ "type": "object" }),
            },
        }];
        let message = client
            .complete(vec![ChatMessage::user("hi")], Some(tools))
            .await
            .unwrap();
        assert_eq!(message.content.as_deref(), Some("hello"));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_http_error_surfaces_as_llm_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500);
            })
            .await;

        let client = LlmClient::new(server.base_url(), "k", "m").unwrap();
        let err = client
            .complete(vec![ChatMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Llm(_)));
    }
}
