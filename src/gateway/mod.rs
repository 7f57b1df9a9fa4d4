//! Gateway implementations

mod builder;
mod llm;
mod rotation;

pub use builder::{Huginn, HuginnBuilder};
pub use llm::{LlmGateway, ROTATION_COUNTER_KEY};
