//! Cache store adapters.
//!
//! The gateway talks to its response cache through the [`CacheStore`]
//! trait: three operations matching a remote key-value store's
//! `GET` / `SET EX` / `INCR` contract. Any compliant backend is
//! substitutable.
//!
//! - [`RestStore`]: remote store over an HTTPS command-array protocol
//!   (Upstash-compatible). The production backend.
//! - [`MemoryStore`]: in-process store with per-entry expiry, for local
//!   development and tests.
//! - [`UnconfiguredStore`]: fails closed. Every operation returns
//!   [`StoreUnavailable`](crate::HuginnError::StoreUnavailable).
//!
//! Caching is an optimization only. Every store failure must be treated
//! by callers as "absent" (a miss, or a skipped write), never surfaced to
//! the end user.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{REST_TOKEN_ENV, REST_URL_ENV, RestStore};

use async_trait::async_trait;

use crate::{HuginnError, Result};

/// Remote key-value store with expiry.
///
/// All failures (unconfigured backend, network, protocol) are reported as
/// [`HuginnError::StoreUnavailable`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Whether a real backend sits behind this store.
    ///
    /// Failures of an unconfigured store are expected on every call and
    /// are logged quietly.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch a value. `Ok(None)` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any existing one.
    ///
    /// `ttl_secs == 0` stores without expiry.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Atomically increment an integer counter, creating it at 0 first if
    /// absent. Returns the new value.
    async fn increment(&self, key: &str) -> Result<i64>;
}

/// Store used when no backend is configured. Every operation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

impl UnconfiguredStore {
    fn unavailable<T>() -> Result<T> {
        Err(HuginnError::StoreUnavailable(
            "cache store not configured".into(),
        ))
    }
}

#[async_trait]
impl CacheStore for UnconfiguredStore {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Self::unavailable()
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Self::unavailable()
    }

    async fn increment(&self, _key: &str) -> Result<i64> {
        Self::unavailable()
    }
}
