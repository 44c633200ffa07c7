//! Bearer-token acquisition and caching.
//!
//! The cache resolves a usable token through three layers in order: the
//! in-memory slot, the durable store, and a fresh `auth/login` call. All
//! three can fail; every failure collapses to `None` so callers treat a
//! missing token as a normal outcome, not an error.
//!
//! A single async mutex guards the whole chain, so concurrent callers that
//! miss the in-memory slot wait for one refresh instead of issuing
//! duplicate logins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::http::HemisClient;

/// A bearer token with its client-side expiry.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub expiry: DateTime<Utc>,
}

impl Token {
    /// Whether the token is still fresh at `now`. Expiry is exclusive: a
    /// token whose expiry equals `now` is already stale.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

/// On-disk shape of the single-record token store.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    expiry: DateTime<Utc>,
}

/// Durable storage for at most one token record.
///
/// Implementations never surface errors: a failed load is an absent token
/// and a failed save is forgotten.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Option<Token>;
    async fn save(&self, token: &Token);
}

/// JSON-file token store, one record per file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<Token> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "No stored token");
                return None;
            }
        };
        match serde_json::from_slice::<StoredToken>(&raw) {
            Ok(record) => Some(Token {
                value: record.token,
                expiry: record.expiry,
            }),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Ignoring unreadable token record");
                None
            }
        }
    }

    async fn save(&self, token: &Token) {
        let record = StoredToken {
            token: token.value.clone(),
            expiry: token.expiry,
        };
        let raw = match serde_json::to_vec_pretty(&record) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "Failed to encode token record");
                return;
            }
        };
        if let Err(err) = tokio::fs::write(&self.path, raw).await {
            warn!(path = %self.path.display(), %err, "Failed to persist token record");
        }
    }
}

/// Resolves and caches a bearer token for the HEMIS API.
pub struct TokenCache {
    client: HemisClient,
    store: Box<dyn TokenStore>,
    credentials: Option<(String, String)>,
    ttl: Duration,
    // Guards the memory -> store -> login chain end to end.
    slot: Mutex<Option<Token>>,
}

impl TokenCache {
    pub fn new(
        client: HemisClient,
        store: Box<dyn TokenStore>,
        credentials: Option<(String, String)>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            store,
            credentials,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Resolve a valid token, refreshing through the store and a login call
    /// as needed. Returns `None` when no valid token can be obtained.
    pub async fn get_valid_token(&self) -> Option<String> {
        let mut slot = self.slot.lock().await;
        let now = Utc::now();

        if let Some(token) = slot.as_ref() {
            if token.is_valid_at(now) {
                return Some(token.value.clone());
            }
            debug!("In-memory token expired");
        }

        if let Some(token) = self.store.load().await {
            if token.is_valid_at(now) {
                debug!(expiry = %token.expiry, "Adopted stored token");
                let value = token.value.clone();
                *slot = Some(token);
                return Some(value);
            }
            debug!(expiry = %token.expiry, "Stored token expired");
        }

        let token = self.login().await?;
        self.store.save(&token).await;
        let value = token.value.clone();
        *slot = Some(token);
        Some(value)
    }

    /// Drop any cached token so the next resolution starts from the store.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    async fn login(&self) -> Option<Token> {
        let (login, password) = match &self.credentials {
            Some(credentials) => credentials,
            None => {
                debug!("No credentials configured, skipping login");
                return None;
            }
        };

        let body = serde_json::json!({ "login": login, "password": password });
        let response = self.client.post_json("auth/login", &body).await?;

        let success = response
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !success {
            warn!("HEMIS login rejected");
            return None;
        }

        let value = response
            .get("data")
            .and_then(|data| data.get("token"))
            .and_then(serde_json::Value::as_str)?
            .to_string();

        let token = Token {
            value,
            expiry: Utc::now() + self.ttl,
        };
        info!(expiry = %token.expiry, "Obtained fresh HEMIS token");
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn cache_for(server: &MockServer, store: Box<dyn TokenStore>) -> TokenCache {
        let client = HemisClient::new(server.base_url()).unwrap();
        TokenCache::new(
            client,
            store,
            Some(("student1".to_string(), "secret".to_string())),
            Duration::days(7),
        )
    }

    struct EmptyStore;

    #[async_trait]
    impl TokenStore for EmptyStore {
        async fn load(&self) -> Option<Token> {
            None
        }
        async fn save(&self, _token: &Token) {}
    }

    #[test]
    fn test_token_validity_boundary() {
        let now = Utc::now();
        let token = Token {
            value: "t".to_string(),
            expiry: now,
        };
        assert!(!token.is_valid_at(now));
        assert!(token.is_valid_at(now - Duration::seconds(1)));
        assert!(!token.is_valid_at(now + Duration::seconds(1)));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token_cache.json"));

        assert!(store.load().await.is_none());

        let token = Token {
            value: "abc123".to_string(),
            expiry: Utc::now() + Duration::days(3),
        };
        store.save(&token).await;

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.value, "abc123");
        assert_eq!(loaded.expiry, token.expiry);
    }

    #[tokio::test]
    async fn test_file_store_ignores_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_cache.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileTokenStore::new(path);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_login_called_once_across_resolutions() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200)
                    .json_body(serde_json::json!({
                        "success": true,
                        "data": { "token": "fresh-token" }
                    }));
            })
            .await;

        let cache = cache_for(&server, Box::new(EmptyStore));
        assert_eq!(cache.get_valid_token().await.as_deref(), Some("fresh-token"));
        assert_eq!(cache.get_valid_token().await.as_deref(), Some("fresh-token"));

        login.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_stored_token_avoids_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "unused" }
                }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token_cache.json"));
        store
            .save(&Token {
                value: "stored-token".to_string(),
                expiry: Utc::now() + Duration::days(1),
            })
            .await;

        let cache = cache_for(&server, Box::new(store));
        assert_eq!(
            cache.get_valid_token().await.as_deref(),
            Some("stored-token")
        );
        login.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_expired_stored_token_falls_through_to_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "fresh-token" }
                }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token_cache.json"));
        store
            .save(&Token {
                value: "stale-token".to_string(),
                expiry: Utc::now() - Duration::seconds(1),
            })
            .await;

        let cache = cache_for(&server, Box::new(store));
        assert_eq!(cache.get_valid_token().await.as_deref(), Some("fresh-token"));
        login.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_one_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "fresh-token" }
                }));
            })
            .await;

        let cache = std::sync::Arc::new(cache_for(&server, Box::new(EmptyStore)));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_valid_token().await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().as_deref(), Some("fresh-token"));
        }
        login.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_rejected_login_yields_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200)
                    .json_body(serde_json::json!({ "success": false }));
            })
            .await;

        let cache = cache_for(&server, Box::new(EmptyStore));
        assert!(cache.get_valid_token().await.is_none());
    }

    #[tokio::test]
    async fn test_no_credentials_short_circuits_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "data": { "token": "unreachable" }
                }));
            })
            .await;

        let client = HemisClient::new(server.base_url()).unwrap();
        let cache = TokenCache::new(client, Box::new(EmptyStore), None, Duration::days(7));
        assert!(cache.get_valid_token().await.is_none());
        login.assert_hits_async(0).await;
    }
}
