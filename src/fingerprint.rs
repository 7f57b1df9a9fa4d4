//! Content fingerprints and cache-key derivation.
//!
//! A fingerprint is a SHA-256 digest of the request's semantic content:
//! the model name followed by every message's content, in order:
//!
//! ```text
//! sha256(model ":" content_1 "|" content_2 "|" ... content_n)
//! ```
//!
//! Roles are not part of the digest, and neither are the sampling
//! parameters unless [`FingerprintPolicy::IncludeSampling`] is selected.
//! The `|` delimiter is not escaped, so contents that themselves contain
//! `|` can in theory collide (`["a|b"]` vs `["a", "b"]`).
//!
//! The digest is stable across processes, so entries written by one
//! instance are hits for every other instance sharing the store.

use sha2::{Digest, Sha256};

use crate::types::{ChatRequest, Message};

/// Namespace prefix for response cache keys in the shared store.
pub const CACHE_KEY_PREFIX: &str = "llm:";

/// Which request fields participate in the fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FingerprintPolicy {
    /// Model and message contents only. Requests that differ only in
    /// temperature or max_tokens share a cache entry.
    #[default]
    ContentOnly,
    /// Also fold temperature and max_tokens into the digest.
    IncludeSampling,
}

impl FingerprintPolicy {
    /// Fingerprint a request under this policy.
    pub fn fingerprint(&self, request: &ChatRequest) -> String {
        match self {
            FingerprintPolicy::ContentOnly => fingerprint(&request.model, &request.messages),
            FingerprintPolicy::IncludeSampling => {
                let mut input = fingerprint_input(&request.model, &request.messages);
                input.push_str(&format!(
                    "#t={};max={}",
                    request.temperature, request.max_tokens
                ));
                sha256_hex(&input)
            }
        }
    }

    /// Full namespaced cache key for a request under this policy.
    pub fn cache_key(&self, request: &ChatRequest) -> String {
        cache_key(&request.model, &self.fingerprint(request))
    }
}

/// Deterministic digest of `model` and the ordered message contents.
pub fn fingerprint(model: &str, messages: &[Message]) -> String {
    sha256_hex(&fingerprint_input(model, messages))
}

/// Namespaced store key: `"llm:" + sha256(model ":" fingerprint)`.
pub fn cache_key(model: &str, fingerprint: &str) -> String {
    format!(
        "{CACHE_KEY_PREFIX}{}",
        sha256_hex(&format!("{model}:{fingerprint}"))
    )
}

fn fingerprint_input(model: &str, messages: &[Message]) -> String {
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    format!("{model}:{}", contents.join("|"))
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
