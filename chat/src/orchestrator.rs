//! Query orchestration: one tool round per user query.
//!
//! The transcript mirrors what the OpenAI tool-calling protocol expects:
//! user message, assistant message with tool calls echoed back verbatim,
//! one `tool` message per call keyed by its id, then a closing completion
//! without tools so the model summarizes the results.

use serde_json::Value;
use tracing::info;

use crate::error::ChatResult;
use crate::llm::LlmClient;
use crate::protocol::ChatMessage;
use crate::session::ToolBackend;

pub struct Orchestrator {
    llm: LlmClient,
    tools: Box<dyn ToolBackend>,
}

impl Orchestrator {
    pub fn new(llm: LlmClient, tools: Box<dyn ToolBackend>) -> Self {
        Self { llm, tools }
    }

    /// Run one query through the model. Tool failures never abort the
    /// turn; the failure text is fed back to the model as the tool result.
    pub async fn process_query(&self, query: &str) -> ChatResult<String> {
        let mut messages = vec![ChatMessage::user(query)];
        let tools = self.tools.list_tools().await?;

        let assistant = self.llm.complete(messages.clone(), Some(tools)).await?;
        let mut final_text = vec![assistant.content.clone().unwrap_or_default()];

        let calls = assistant.tool_calls.clone().unwrap_or_default();
        if calls.is_empty() {
            return Ok(final_text.join("\n"));
        }
        messages.push(assistant);

        for call in &calls {
            let name = &call.function.name;
            let (args_text, result) =
                match serde_json::from_str::<Value>(&call.function.arguments) {
                    Ok(args) => {
                        let args_text = args.to_string();
                        info!(tool = %name, "Executing tool call");
                        let result = match self.tools.call_tool(name, args).await {
                            Ok(text) => text,
                            Err(err) => format!("Error executing tool: {err}"),
                        };
                        (args_text, result)
                    }
                    Err(err) => (
                        call.function.arguments.clone(),
                        format!("Error decoding tool arguments: {err}"),
                    ),
                };
            final_text.push(format!("[Calling tool {name} with args {args_text}]"));
            messages.push(ChatMessage::tool(call.id.clone(), result));
        }

        let closing = self.llm.complete(messages, None).await?;
        if let Some(content) = closing.content {
            final_text.push(content);
        }
        Ok(final_text.join("\n"))
    }
}

/// True when the REPL line asks to exit.
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}
