//! Environment-driven configuration.
//!
//! The backend does not advertise token lifetimes, so freshness is a
//! client-side policy: `HEMIS_TOKEN_TTL_DAYS` (default 7) controls how long
//! a token obtained from `auth/login` is trusted.

use std::path::PathBuf;

use chrono::Duration;

use crate::error::{ApiError, ApiResult};

/// Default client-side token freshness window, in days.
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Default path of the durable single-record token store.
const DEFAULT_TOKEN_CACHE: &str = "token_cache.json";

/// Configuration for reaching a HEMIS deployment.
#[derive(Debug, Clone)]
pub struct HemisConfig {
    /// Base URL of the HEMIS REST API, e.g. `https://student.example.uz/rest/v1`.
    pub base_url: String,
    /// Student login id. Protected tools are unavailable without it.
    pub login: Option<String>,
    /// Student password.
    pub password: Option<String>,
    /// How long a freshly obtained token is considered valid.
    pub token_ttl: Duration,
    /// Where the durable token record lives.
    pub token_cache_path: PathBuf,
}

impl HemisConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let base_url = lookup("HEMIS_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiError::Config("HEMIS_API_BASE is not set".to_string()))?;

        let ttl_days = match lookup("HEMIS_TOKEN_TTL_DAYS") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                ApiError::Config(format!("invalid HEMIS_TOKEN_TTL_DAYS value: {raw}"))
            })?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };
        if ttl_days <= 0 {
            return Err(ApiError::Config(
                "HEMIS_TOKEN_TTL_DAYS must be positive".to_string(),
            ));
        }

        let token_cache_path = lookup("HEMIS_TOKEN_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_CACHE));

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            login: lookup("HEMIS_LOGIN").filter(|v| !v.is_empty()),
            password: lookup("HEMIS_PASSWORD").filter(|v| !v.is_empty()),
            token_ttl: Duration::days(ttl_days),
            token_cache_path,
        })
    }

    /// Login credentials, present only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.login.as_deref(), self.password.as_deref()) {
            (Some(login), Some(password)) => Some((login, password)),
            _ => None,
        }
    }
}
