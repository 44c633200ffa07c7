//! Error types for the HEMIS access layer.
//!
//! Most of this crate deliberately does not raise: the token cache and the
//! HTTP fetch path collapse failures into `None` so callers can treat them
//! as a normal outcome. Errors here cover construction-time problems only.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
