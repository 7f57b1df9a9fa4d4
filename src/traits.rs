//! Core Gateway trait

use async_trait::async_trait;

use crate::Result;
use crate::types::ChatRequest;

/// The single entry point every generation route calls through.
///
/// Route handlers depend on this trait rather than a concrete gateway, so
/// they can be exercised against a fake in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Produce the completion text for `request`.
    ///
    /// Serves from the response cache when `request.ttl > 0` and an entry
    /// exists; otherwise calls the completion service, rotating credentials
    /// on rate limits. Fails only on unrecoverable completion errors, never
    /// because the cache is unavailable.
    async fn invoke(&self, request: &ChatRequest) -> Result<String>;
}
