//! MCP server for the HEMIS student API.
//!
//! Tools are declared in a static [`registry`]; every call runs the same
//! authenticate, fetch, format pipeline in [`dispatch`] and renders a
//! Markdown report from [`reports`]. The MCP surface itself lives in
//! [`service`].

pub mod dispatch;
pub mod registry;
pub mod reports;
pub mod service;

pub use dispatch::{Dispatcher, AUTH_UNAVAILABLE};
pub use registry::{registry, ParamKind, ParamSpec, ToolArgs, ToolEntry};
pub use service::HemisService;
