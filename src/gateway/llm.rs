//! LlmGateway - cache, key rotation, and completion in one call

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{Level, debug, instrument, warn};

use super::rotation::with_rotation;
use crate::cache::CacheStore;
use crate::credentials::{CredentialSource, random_start_index, start_index};
use crate::fingerprint::FingerprintPolicy;
use crate::providers::CompletionClient;
use crate::telemetry;
use crate::types::ChatRequest;
use crate::{Gateway, HuginnError, Result};

/// Store key of the shared round-robin counter.
pub const ROTATION_COUNTER_KEY: &str = "rotation_counter";

/// Gateway over one completion client, one cache store and one key source.
///
/// Holds no per-request state; share it across tasks with `Arc`.
pub struct LlmGateway {
    client: Arc<dyn CompletionClient>,
    store: Arc<dyn CacheStore>,
    credentials: Arc<dyn CredentialSource>,
    fingerprint_policy: FingerprintPolicy,
}

/// Where a successful answer came from.
#[derive(Clone, Copy)]
enum Source {
    Cache,
    Completion,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Completion => "completion",
        }
    }
}

impl LlmGateway {
    pub(crate) fn new(
        client: Arc<dyn CompletionClient>,
        store: Arc<dyn CacheStore>,
        credentials: Arc<dyn CredentialSource>,
        fingerprint_policy: FingerprintPolicy,
    ) -> Self {
        Self {
            client,
            store,
            credentials,
            fingerprint_policy,
        }
    }

    /// Fingerprint policy used to derive cache keys.
    pub fn fingerprint_policy(&self) -> FingerprintPolicy {
        self.fingerprint_policy
    }

    async fn run(&self, request: &ChatRequest) -> Result<(String, Source)> {
        request.validate()?;

        let cache_key = request
            .is_cacheable()
            .then(|| self.fingerprint_policy.cache_key(request));

        if let Some(key) = &cache_key {
            if request.refresh {
                debug!("refresh requested, skipping cache lookup");
            } else if let Some(content) = self.lookup(key, &request.model).await {
                return Ok((content, Source::Cache));
            }
        }

        let pool = self.credentials.load();
        if pool.is_empty() {
            return Err(HuginnError::NoCredentialsConfigured);
        }

        let start = self.rotation_start(pool.len()).await;
        let client = self.client.as_ref();
        let content = with_rotation(&pool, start, &request.model, |credential| async move {
            let result = client.complete(credential, request).await;
            let status = if result.is_ok() { "ok" } else { "error" };
            metrics::counter!(telemetry::COMPLETION_CALLS_TOTAL,
                "client" => client.name().to_owned(),
                "status" => status,
            )
            .increment(1);
            result
        })
        .await?;

        if let Some(key) = &cache_key {
            self.populate(key, &content, request.ttl).await;
        }
        Ok((content, Source::Completion))
    }

    /// Cache lookup; every store failure reads as a miss.
    async fn lookup(&self, key: &str, model: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(Some(content)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "model" => model.to_owned())
                    .increment(1);
                debug!("response cache hit");
                Some(content)
            }
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "model" => model.to_owned())
                    .increment(1);
                None
            }
            Err(e) => {
                self.record_store_error("get", &e);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "model" => model.to_owned())
                    .increment(1);
                None
            }
        }
    }

    /// Best-effort cache write; failures are logged and dropped.
    async fn populate(&self, key: &str, content: &str, ttl: u64) {
        if let Err(e) = self.store.set(key, content, ttl).await {
            self.record_store_error("set", &e);
        }
    }

    /// Round-robin offset from the shared counter, random if unreachable.
    async fn rotation_start(&self, pool_size: usize) -> usize {
        let index = match self.store.increment(ROTATION_COUNTER_KEY).await {
            Ok(counter) => start_index(counter, pool_size),
            Err(e) => {
                self.record_store_error("increment", &e);
                random_start_index(pool_size)
            }
        };
        index.unwrap_or(0)
    }

    /// Log level for absorbed store failures: debug when caching is off.
    fn store_error_level(&self) -> Level {
        if self.store.is_configured() {
            Level::WARN
        } else {
            Level::DEBUG
        }
    }

    fn record_store_error(&self, operation: &'static str, e: &HuginnError) {
        metrics::counter!(telemetry::CACHE_STORE_ERRORS_TOTAL, "operation" => operation)
            .increment(1);
        if self.store_error_level() == Level::DEBUG {
            debug!(operation, store = self.store.name(), "cache store not configured");
        } else {
            warn!(
                operation,
                store = self.store.name(),
                error = %e,
                "cache store operation failed, continuing without it"
            );
        }
    }
}

#[async_trait]
impl Gateway for LlmGateway {
    #[instrument(skip_all, fields(model = %request.model, ttl = request.ttl))]
    async fn invoke(&self, request: &ChatRequest) -> Result<String> {
        let start = Instant::now();
        let outcome = self.run(request).await;

        let (status, source) = match &outcome {
            Ok((_, source)) => ("ok", source.label()),
            Err(_) => ("error", "none"),
        };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "model" => request.model.clone(),
            "status" => status,
            "source" => source,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "model" => request.model.clone(),
        )
        .record(start.elapsed().as_secs_f64());

        match outcome {
            Ok((content, _)) => Ok(content),
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "gateway invocation failed");
                Err(e)
            }
        }
    }
}
