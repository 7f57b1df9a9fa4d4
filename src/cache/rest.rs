//! REST-protocol remote store client.
//!
//! Speaks the Upstash-style command-array protocol: every command is a
//! `POST {url}` whose JSON body is the command and its arguments
//! (`["SET", "k", "v", "EX", 60]`), authorized with a bearer token. The
//! reply is `{"result": ...}` on success or `{"error": "..."}` on failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use super::{CacheStore, UnconfiguredStore};
use crate::{HuginnError, Result};

/// Environment variable holding the store's REST endpoint.
pub const REST_URL_ENV: &str = "UPSTASH_REDIS_REST_URL";

/// Environment variable holding the store's bearer token.
pub const REST_TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";

/// Per-command timeout. Cache calls sit on the request path, so they
/// must give up well before a completion call would.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a remote key-value store reachable over HTTPS.
#[derive(Clone)]
pub struct RestStore {
    url: String,
    token: String,
    http: Client,
}

impl RestStore {
    /// Create a client for the given endpoint and token.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    /// Build a store from the process environment.
    ///
    /// Missing URL or token yields an [`UnconfiguredStore`], so the gateway
    /// keeps working with caching disabled.
    pub fn from_env() -> Arc<dyn CacheStore> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a store from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Arc<dyn CacheStore> {
        let url = lookup(REST_URL_ENV).filter(|v| !v.trim().is_empty());
        let token = lookup(REST_TOKEN_ENV).filter(|v| !v.trim().is_empty());

        let (Some(url), Some(token)) = (url, token) else {
            warn!("{REST_URL_ENV} or {REST_TOKEN_ENV} not set, response caching disabled");
            return Arc::new(UnconfiguredStore);
        };

        match Self::new(url, token) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "failed to build cache store client, response caching disabled");
                Arc::new(UnconfiguredStore)
            }
        }
    }

    /// Send one command and return its `result` field.
    async fn command(&self, args: Value) -> Result<Value> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| HuginnError::StoreUnavailable(e.to_string()))?;

        let status = response.status();
        let body: CommandResponse = response.json().await.map_err(|e| {
            HuginnError::StoreUnavailable(format!("malformed reply ({status}): {e}"))
        })?;

        if let Some(error) = body.error {
            return Err(HuginnError::StoreUnavailable(error));
        }
        if !status.is_success() {
            return Err(HuginnError::StoreUnavailable(format!("HTTP {status}")));
        }
        Ok(body.result)
    }
}

#[async_trait]
impl CacheStore for RestStore {
    fn name(&self) -> &str {
        "rest"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            // Stores that auto-decode JSON hand back structured values.
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let args = if ttl_secs > 0 {
            json!(["SET", key, value, "EX", ttl_secs])
        } else {
            json!(["SET", key, value])
        };
        self.command(args).await.map(|_| ())
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let result = self.command(json!(["INCR", key])).await?;
        result
            .as_i64()
            .or_else(|| result.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| {
                HuginnError::StoreUnavailable(format!("INCR returned non-integer: {result}"))
            })
    }
}

#[derive(Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}
