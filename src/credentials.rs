//! Completion-service credentials and rotation offsets.
//!
//! The key pool is read from its [`CredentialSource`] on every gateway
//! invocation; nothing is cached in-process, so rotating keys in the
//! environment takes effect on the next request.
//!
//! # Environment layout
//!
//! ```text
//! GROQ_API_KEY_1=...   ┐
//! GROQ_API_KEY_2=...   ├─ rotation pool, read until the first gap
//! GROQ_API_KEY_3=...   ┘
//! GROQ_API_KEY=...     ── used only when no numbered key is set
//! ```
//!
//! Blank values are skipped and duplicates keep their first position.

use std::fmt;

use rand::Rng;

/// Default environment variable prefix for completion-service keys.
pub const DEFAULT_KEY_ENV: &str = "GROQ_API_KEY";

/// Upper bound on numbered keys scanned, guarding against runaway lookups.
const MAX_NUMBERED_KEYS: usize = 64;

/// Ordered, immutable pool of opaque credentials for one invocation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyPool {
    keys: Vec<String>,
}

impl KeyPool {
    /// Build a pool from explicit keys, dropping blanks and duplicates.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into().trim().to_string();
            if !key.is_empty() && !pool.contains(&key) {
                pool.push(key);
            }
        }
        Self { keys: pool }
    }

    /// Load a pool using `prefix_1`, `prefix_2`, … then `prefix`.
    pub fn from_lookup(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let numbered: Vec<String> = (1..=MAX_NUMBERED_KEYS)
            .map_while(|i| lookup(&format!("{prefix}_{i}")))
            .collect();
        let pool = Self::new(numbered);
        if !pool.is_empty() {
            return pool;
        }
        Self::new(lookup(prefix))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// Credentials in rotation order, starting at `start` and wrapping.
    pub fn rotation(&self, start: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        let n = self.keys.len();
        (0..n).map(move |step| {
            let index = (start + step) % n;
            (index, self.keys[index].as_str())
        })
    }
}

// Keys never appear in logs or debug output.
impl fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPool").field("len", &self.keys.len()).finish()
    }
}

/// Starting index from a shared counter value.
///
/// Returns `None` for an empty pool.
pub fn start_index(counter: i64, pool_size: usize) -> Option<usize> {
    if pool_size == 0 {
        return None;
    }
    Some(counter.rem_euclid(pool_size as i64) as usize)
}

/// Uniformly random starting index, used when the counter is unreachable.
pub fn random_start_index(pool_size: usize) -> Option<usize> {
    if pool_size == 0 {
        return None;
    }
    Some(rand::thread_rng().gen_range(0..pool_size))
}

/// Where the gateway loads its key pool from on each invocation.
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> KeyPool;
}

/// Reads keys from the process environment at call time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    prefix: String,
}

impl EnvCredentials {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_ENV)
    }
}

impl CredentialSource for EnvCredentials {
    fn load(&self) -> KeyPool {
        KeyPool::from_lookup(&self.prefix, |name| std::env::var(name).ok())
    }
}

/// Fixed key list, for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(KeyPool);

impl StaticCredentials {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(KeyPool::new(keys))
    }
}

impl CredentialSource for StaticCredentials {
    fn load(&self) -> KeyPool {
        self.0.clone()
    }
}
