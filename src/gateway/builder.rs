//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::LlmGateway;
use crate::Result;
use crate::cache::{CacheStore, RestStore, UnconfiguredStore};
use crate::config::GatewayConfig;
use crate::credentials::{CredentialSource, EnvCredentials, StaticCredentials};
use crate::fingerprint::FingerprintPolicy;
use crate::providers::{CompletionClient, GroqClient};

/// Main entry point for creating gateway instances.
pub struct Huginn;

impl Huginn {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }

    /// Build a gateway entirely from the process environment.
    ///
    /// Reads [`GatewayConfig`] plus the credential and cache-store
    /// variables. A missing cache store disables caching; missing
    /// credentials only surface when a request needs them.
    pub fn from_env() -> Result<LlmGateway> {
        let config = GatewayConfig::from_env()?;
        Self::builder()
            .config(&config)
            .cache_store(RestStore::from_env())
            .build()
    }
}

/// Builder for configuring gateway instances.
pub struct HuginnBuilder {
    client: Option<Arc<dyn CompletionClient>>,
    store: Option<Arc<dyn CacheStore>>,
    credentials: Option<Arc<dyn CredentialSource>>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    key_env: Option<String>,
    fingerprint_policy: FingerprintPolicy,
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            store: None,
            credentials: None,
            base_url: None,
            timeout_secs: None,
            key_env: None,
            fingerprint_policy: FingerprintPolicy::default(),
        }
    }

    /// Apply every setting from a [`GatewayConfig`].
    pub fn config(mut self, config: &GatewayConfig) -> Self {
        self.base_url = Some(config.completion_url.clone());
        self.timeout_secs = Some(config.timeout_secs);
        self.key_env = Some(config.key_env.clone());
        self.fingerprint_policy = config.fingerprint_policy();
        self
    }

    /// Use a custom completion client instead of the built-in Groq client.
    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the response cache store. Without one, caching is disabled.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set where the key pool is loaded from on each invocation.
    pub fn credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    /// Use a fixed list of API keys.
    pub fn api_keys<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credentials(Arc::new(StaticCredentials::new(keys)))
    }

    /// Completion API base URL for the built-in client.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-call HTTP timeout for the built-in client (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Choose which request fields participate in cache fingerprints.
    pub fn fingerprint_policy(mut self, policy: FingerprintPolicy) -> Self {
        self.fingerprint_policy = policy;
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<LlmGateway> {
        let client: Arc<dyn CompletionClient> = match self.client {
            Some(client) => client,
            None => {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| crate::providers::DEFAULT_BASE_URL.to_string());
                let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(60));
                Arc::new(GroqClient::with_options(base_url, timeout)?)
            }
        };

        let store = self.store.unwrap_or_else(|| Arc::new(UnconfiguredStore));

        let credentials = self.credentials.unwrap_or_else(|| match self.key_env {
            Some(prefix) => Arc::new(EnvCredentials::new(prefix)),
            None => Arc::new(EnvCredentials::default()),
        });

        Ok(LlmGateway::new(
            client,
            store,
            credentials,
            self.fingerprint_policy,
        ))
    }
}

impl Default for HuginnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
