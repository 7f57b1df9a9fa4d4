//! Huginn - caching, key-rotating gateway for LLM completion requests
//!
//! Every AI-generation route calls through one function,
//! [`Gateway::invoke`]. The gateway:
//!
//! - serves repeated requests from a content-addressed response cache
//!   (per-request TTL, `0` = never cache),
//! - rotates across a pool of API keys when one is rate limited,
//! - keeps working when the cache backend is missing or down.
//!
//! Completion text often wraps JSON in prose or markdown fences; the
//! [`extract`] module recovers it.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::{ChatRequest, Gateway, Huginn, Message, SMART_MODEL};
//! use huginn::extract::extract_json_array_or;
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     // GROQ_API_KEY_1.., UPSTASH_REDIS_REST_URL/TOKEN from the environment
//!     let gateway = Huginn::from_env()?;
//!
//!     let request = ChatRequest::new(
//!         SMART_MODEL,
//!         vec![Message::user("Write five quiz questions on Rust ownership as a JSON array.")],
//!     )
//!     .ttl(3600);
//!
//!     let text = gateway.invoke(&request).await?;
//!     let questions = extract_json_array_or(&text, Vec::new());
//!     println!("{} questions", questions.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod gateway;
pub mod providers;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use config::GatewayConfig;
pub use error::{HuginnError, PUBLIC_FAILURE_MESSAGE, Result};
pub use extract::ParseError;
pub use gateway::{Huginn, HuginnBuilder, LlmGateway};
pub use traits::Gateway;
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{ChatRequest, FAST_MODEL, Message, Role, SMART_MODEL};
