//! Credential rotation on rate-limit failures.
//!
//! Where a retry loop re-sends the same call after a delay, rotation
//! re-sends it immediately with the next credential in the pool. Only
//! [`RateLimited`](crate::HuginnError::RateLimited) failures rotate; every
//! other error is terminal for the invocation.

use std::future::Future;

use tracing::warn;

use crate::credentials::KeyPool;
use crate::telemetry;
use crate::{HuginnError, Result};

/// Run `f` with each credential in rotation order until one succeeds.
///
/// Starts at `start` and wraps around, trying each credential at most once.
/// A rate-limit failure moves on to the next credential while untried ones
/// remain; a rate-limit on the last credential, or any other failure, is
/// returned as-is.
pub(crate) async fn with_rotation<'a, F, Fut, T>(
    pool: &'a KeyPool,
    start: usize,
    model: &str,
    f: F,
) -> Result<T>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let total = pool.len();
    let mut last_err = None;
    for (attempt, (key_index, credential)) in pool.rotation(start).enumerate() {
        match f(credential).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_rate_limited() && attempt + 1 < total => {
                metrics::counter!(telemetry::ROTATIONS_TOTAL, "model" => model.to_owned())
                    .increment(1);
                warn!(
                    model,
                    key_index,
                    attempt = attempt + 1,
                    pool_size = total,
                    error = %e,
                    "credential rate limited, rotating to next key"
                );
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or(HuginnError::CredentialsExhausted))
}
