//! MCP client session over a child-process stdio transport.

use std::borrow::Cow;

use async_trait::async_trait;
use rmcp::{
    model::{CallToolRequestParam, RawContent},
    service::RunningService,
    transport::{ConfigureCommandExt, TokioChildProcess},
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tracing::info;

use crate::error::{ChatError, ChatResult};
use crate::protocol::{FunctionDefinition, ToolDefinition};

/// Tool execution seam between the orchestrator and MCP. The production
/// implementation is [`McpSession`].
#[async_trait]
pub trait ToolBackend: Send + Sync {
    async fn list_tools(&self) -> ChatResult<Vec<ToolDefinition>>;
    async fn call_tool(&self, name: &str, args: Value) -> ChatResult<String>;
}

pub struct McpSession {
    client: RunningService<RoleClient, ()>,
}

impl McpSession {
    /// Spawn the server command and initialize an MCP session over its
    /// stdio. The child's stderr is inherited so server logs stay visible.
    pub async fn connect(command: &str, args: &[String]) -> ChatResult<Self> {
        let transport = TokioChildProcess::new(tokio::process::Command::new(command).configure(
            |cmd| {
                cmd.args(args).stderr(std::process::Stdio::inherit());
            },
        ))
        .map_err(|err| ChatError::Mcp(format!("failed to spawn server: {err}")))?;

        let client = ()
            .serve(transport)
            .await
            .map_err(|err| ChatError::Mcp(format!("failed to initialize session: {err}")))?;

        info!(command, "Connected to MCP server");
        Ok(Self { client })
    }

    pub async fn close(self) -> ChatResult<()> {
        self.client
            .cancel()
            .await
            .map_err(|err| ChatError::Mcp(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ToolBackend for McpSession {
    /// MCP tool inventory converted to the OpenAI function-tool shape;
    /// the input schema passes through unchanged as `parameters`.
    async fn list_tools(&self) -> ChatResult<Vec<ToolDefinition>> {
        let tools = self
            .client
            .peer()
            .list_all_tools()
            .await
            .map_err(|err| ChatError::Mcp(err.to_string()))?;

        Ok(tools
            .into_iter()
            .map(|tool| ToolDefinition {
                r#type: "function".to_string(),
                function: FunctionDefinition {
                    name: tool.name.to_string(),
                    description: tool
                        .description
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    parameters: Value::Object((*tool.input_schema).clone()),
                },
            })
            .collect())
    }

    /// Execute a tool and return its concatenated text content. Results
    /// flagged `is_error` still come back as text for the model to read.
    async fn call_tool(&self, name: &str, args: Value) -> ChatResult<String> {
        let arguments = match args {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                return Err(ChatError::Mcp(format!(
                    "tool arguments must be an object, got {other}"
                )))
            }
        };

        let result = self
            .client
            .peer()
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_string()),
                arguments,
            })
            .await
            .map_err(|err| ChatError::Mcp(err.to_string()))?;

        let text: Vec<&str> = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        Ok(text.join("\n"))
    }
}
