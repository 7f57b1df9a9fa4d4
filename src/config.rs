//! Gateway configuration.
//!
//! Everything is environment-provided. Values that are absent fall back
//! to defaults; values that are present but malformed are errors.
//!
//! | Variable                   | Meaning                                   | Default                          |
//! |----------------------------|-------------------------------------------|----------------------------------|
//! | `HUGINN_COMPLETION_URL`    | completion API base URL                   | `https://api.groq.com/openai/v1` |
//! | `HUGINN_TIMEOUT_SECS`      | per-call HTTP timeout                     | `60`                             |
//! | `HUGINN_KEY_ENV`           | prefix of the credential variables        | `GROQ_API_KEY`                   |
//! | `HUGINN_FINGERPRINT`       | `content` or `sampling`                   | `content`                        |
//!
//! Credentials (`GROQ_API_KEY`, `GROQ_API_KEY_1`, …) and the cache store
//! pair (`UPSTASH_REDIS_REST_URL`, `UPSTASH_REDIS_REST_TOKEN`) are read by
//! [`EnvCredentials`](crate::credentials::EnvCredentials) and
//! [`RestStore::from_env`](crate::cache::RestStore::from_env).

use crate::credentials::DEFAULT_KEY_ENV;
use crate::fingerprint::FingerprintPolicy;
use crate::providers::{COMPLETION_URL_ENV, DEFAULT_BASE_URL};
use crate::{HuginnError, Result};

const TIMEOUT_ENV: &str = "HUGINN_TIMEOUT_SECS";
const KEY_ENV_ENV: &str = "HUGINN_KEY_ENV";
const FINGERPRINT_ENV: &str = "HUGINN_FINGERPRINT";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Completion API base URL.
    pub completion_url: String,
    /// Per-call HTTP timeout in seconds (default: 60).
    pub timeout_secs: u64,
    /// Prefix of the credential environment variables.
    pub key_env: String,
    /// Fold temperature and max_tokens into cache fingerprints.
    pub include_sampling_in_fingerprint: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            completion_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            key_env: DEFAULT_KEY_ENV.to_string(),
            include_sampling_in_fingerprint: false,
        }
    }
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(COMPLETION_URL_ENV) {
            config.completion_url = url;
        }
        if let Some(raw) = get(TIMEOUT_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|e| {
                HuginnError::Configuration(format!("{TIMEOUT_ENV}={raw:?}: {e}"))
            })?;
        }
        if let Some(prefix) = get(KEY_ENV_ENV) {
            config.key_env = prefix;
        }
        if let Some(raw) = get(FINGERPRINT_ENV) {
            config.include_sampling_in_fingerprint = match raw.trim() {
                "content" => false,
                "sampling" => true,
                other => {
                    return Err(HuginnError::Configuration(format!(
                        "{FINGERPRINT_ENV}={other:?}: expected \"content\" or \"sampling\""
                    )));
                }
            };
        }
        Ok(config)
    }

    /// Fingerprint policy selected by this configuration.
    pub fn fingerprint_policy(&self) -> FingerprintPolicy {
        if self.include_sampling_in_fingerprint {
            FingerprintPolicy::IncludeSampling
        } else {
            FingerprintPolicy::ContentOnly
        }
    }
}
