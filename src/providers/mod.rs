//! Completion-service clients.
//!
//! [`CompletionClient`] is the seam the gateway calls through;
//! [`GroqClient`] implements it for OpenAI-compatible chat completion
//! endpoints.

pub mod groq;
pub mod traits;

pub use groq::{COMPLETION_URL_ENV, DEFAULT_BASE_URL, GroqClient};
pub use traits::CompletionClient;
