//! In-process store with per-entry expiry.
//!
//! Backed by moka's bounded cache with a variable expiry policy, so each
//! `set` carries its own TTL just like `SET key value EX ttl` on a remote
//! store. Counters live in the same keyspace and are stored as decimal
//! strings, so `INCR` on a non-integer value fails the way a remote store
//! would, and an increment keeps whatever lifetime the key has left.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::sync::Cache;

use super::CacheStore;
use crate::{HuginnError, Result};

/// Default maximum number of entries.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone, Debug)]
struct StoredValue {
    data: String,
    ttl: Option<Duration>,
    /// Written by `increment`: keep the remaining lifetime, like `INCR`.
    keep_ttl: bool,
}

struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if value.keep_ttl {
            duration_until_expiry
        } else {
            value.ttl
        }
    }
}

/// Thread-safe in-memory [`CacheStore`].
pub struct MemoryStore {
    entries: Cache<String, StoredValue>,
}

impl MemoryStore {
    /// Create an empty store with the default capacity (10,000).
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create an empty store with a custom capacity.
    pub fn with_max_entries(max: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Number of live entries (approximate, per moka semantics).
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.data))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));
        self.entries.insert(
            key.to_string(),
            StoredValue {
                data: value.to_string(),
                ttl,
                keep_ttl: false,
            },
        );
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut failure = None;
        let entry = self
            .entries
            .entry(key.to_string())
            .and_upsert_with(|existing| match existing {
                None => StoredValue {
                    data: "1".to_string(),
                    ttl: None,
                    keep_ttl: false,
                },
                Some(entry) => {
                    let current = entry.into_value();
                    match current.data.parse::<i64>() {
                        Ok(n) => StoredValue {
                            data: n.saturating_add(1).to_string(),
                            ttl: current.ttl,
                            keep_ttl: true,
                        },
                        Err(_) => {
                            failure = Some(current.data.clone());
                            StoredValue {
                                keep_ttl: true,
                                ..current
                            }
                        }
                    }
                }
            });

        if let Some(value) = failure {
            return Err(HuginnError::StoreUnavailable(format!(
                "value at {key} is not an integer: {value}"
            )));
        }
        entry.into_value().data.parse().map_err(|_| {
            HuginnError::StoreUnavailable(format!("value at {key} is not an integer"))
        })
    }
}
