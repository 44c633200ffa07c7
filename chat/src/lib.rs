//! Chat client for the HEMIS MCP server.
//!
//! Connects an OpenAI-compatible LLM to the server's tools: one
//! completion to let the model request tool calls, one tool round
//! executed over MCP, one closing completion over the results.

pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod protocol;
pub mod session;

pub use error::{ChatError, ChatResult};
pub use llm::LlmClient;
pub use orchestrator::Orchestrator;
pub use session::{McpSession, ToolBackend};
