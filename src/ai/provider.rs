//! Model backend trait

use crate::ai::error::AIResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single system + user chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Instruction establishing the task
    pub system_prompt: String,
    /// The user turn (usually carries the email)
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Use this model instead of the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.0,
            max_tokens: 200,
            model: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Core trait that all model backends implement
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Get provider name
    fn name(&self) -> &str;

    /// Default model identifier
    fn model(&self) -> &str;

    /// Run one completion and return the raw text.
    ///
    /// Any transport, authentication or quota failure is an `AIError`; the
    /// text itself is not validated here.
    async fn complete(&self, request: &CompletionRequest) -> AIResult<String>;
}
