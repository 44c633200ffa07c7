//! MCP surface: advertises the registry and routes calls through the
//! dispatcher.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData, RoleServer, ServerHandler,
};
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::registry::{self, input_schema, ToolArgs};

#[derive(Clone)]
pub struct HemisService {
    dispatcher: Arc<Dispatcher>,
}

impl HemisService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    fn tools_list(&self) -> Vec<Tool> {
        registry::registry()
            .iter()
            .map(|entry| Tool {
                name: Cow::Borrowed(entry.name),
                title: None,
                description: Some(Cow::Borrowed(entry.description)),
                input_schema: Arc::new(input_schema(entry)),
                output_schema: None,
                annotations: None,
                icons: None,
            })
            .collect()
    }
}

impl ServerHandler for HemisService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "hemis-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Tools for querying HEMIS university data: student records, grades, \
                 schedules, documents, and public university statistics."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tools_list(),
            ..Default::default()
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let entry = registry::find(&request.name).ok_or_else(|| {
                ErrorData::invalid_request(format!("Unknown tool: {}", request.name), None)
            })?;

            let args = ToolArgs::decode(entry, request.arguments.as_ref())
                .map_err(|message| ErrorData::invalid_params(message, None))?;

            info!(tool = entry.name, "Executing tool");
            let report = self.dispatcher.dispatch(entry, &args).await;
            Ok(CallToolResult::success(vec![Content::text(report)]))
        }
    }
}
