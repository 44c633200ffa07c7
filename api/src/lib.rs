//! HEMIS backend access layer.
//!
//! ## Modules
//!
//! - [`config`]: environment-driven configuration
//! - [`token`]: bearer-token cache with durable single-record storage
//! - [`http`]: HTTP client that collapses every failure to "no data"
//! - [`document`]: safe navigation over loosely-typed JSON payloads

pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod token;

pub use config::HemisConfig;
pub use document::Doc;
pub use error::{ApiError, ApiResult};
pub use http::HemisClient;
pub use token::{FileTokenStore, Token, TokenCache, TokenStore};
