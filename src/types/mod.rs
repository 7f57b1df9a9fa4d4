//! Public types for the Huginn API.

mod message;
mod model;
mod request;

pub use message::{Message, Role};
pub use model::{FAST_MODEL, SMART_MODEL};
pub use request::{ChatRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
