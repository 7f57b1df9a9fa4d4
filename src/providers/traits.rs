//! Completion-service abstraction.
//!
//! The gateway treats the completion service as an opaque capability: one
//! credential plus one request in, one text payload out. Implementations
//! classify failures into [`HuginnError`](crate::HuginnError) variants;
//! the gateway rotates credentials only on
//! [`RateLimited`](crate::HuginnError::RateLimited).
//!
//! # Example
//!
//! ```ignore
//! async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<String> {
//!     let response = self.send(credential, request).await?;
//!     if response.status == 429 {
//!         return Err(HuginnError::RateLimited { retry_after: None });
//!     }
//!     // ... extract the first choice
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::ChatRequest;

/// One outbound call to the completion service with a single credential.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Run one chat completion and return the first choice's text.
    ///
    /// A response with no content yields `Ok(String::new())`, never an error.
    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<String>;
}
