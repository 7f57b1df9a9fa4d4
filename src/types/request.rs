//! Gateway request type

use serde::{Deserialize, Serialize};

use super::Message;
use crate::{HuginnError, Result};

/// Sampling temperature used by the generation routes unless overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion length cap used by the generation routes unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// A single request to the gateway.
///
/// `ttl` is in seconds; `0` disables caching for this request entirely
/// (no lookup, no write).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default)]
    pub ttl: u64,
    /// Skip the cache lookup but still store the fresh result.
    #[serde(default)]
    pub refresh: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            ttl: 0,
            refresh: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn ttl(mut self, secs: u64) -> Self {
        self.ttl = secs;
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Whether this request participates in response caching at all.
    pub fn is_cacheable(&self) -> bool {
        self.ttl > 0
    }

    /// Reject requests the completion service could never satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(HuginnError::InvalidInput("model must not be empty".into()));
        }
        if self.messages.is_empty() {
            return Err(HuginnError::InvalidInput(
                "messages must not be empty".into(),
            ));
        }
        Ok(())
    }
}
