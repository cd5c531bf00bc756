//! OpenAI provider implementation

use crate::ai::config::AIConfig;
use crate::ai::error::{AIError, AIResult};
use crate::ai::provider::{AIProvider, CompletionRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API request structure
#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// OpenAI API response structure
#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

/// OpenAI choice structure
#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

/// OpenAI error response
#[derive(Debug, Clone, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

/// OpenAI chat-completions backend (also works against compatible servers)
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: String, model: String, request_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout,
        }
    }

    /// Point the provider at a different OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create OpenAI provider from config
    pub fn from_config(config: &AIConfig) -> AIResult<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AIError::config_error("OpenAI API key not configured"))?
            .clone();

        let provider = Self::new(api_key, config.model.clone(), config.request_timeout());

        Ok(match config.base_url {
            Some(ref base_url) => provider.with_base_url(base_url.as_str()),
            None => provider,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Create system and user messages for OpenAI
    fn create_messages(&self, system_prompt: &str, user_prompt: &str) -> Vec<OpenAIMessage> {
        vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ]
    }

    /// Map a non-success status to a backend error
    fn error_for_status(&self, status: u16, body: &str) -> AIError {
        let upstream_message = || {
            serde_json::from_str::<OpenAIErrorResponse>(body)
                .map(|r| r.error.message)
                .unwrap_or_else(|_| body.to_string())
        };

        match status {
            401 | 403 => AIError::auth_failure("OpenAI"),
            402 => AIError::insufficient_quota("OpenAI"),
            404 => AIError::model_not_found(self.model.clone(), "OpenAI"),
            429 => AIError::rate_limit("OpenAI"),
            400 => AIError::invalid_response(upstream_message()),
            500..=599 => AIError::provider_unavailable("OpenAI server error"),
            _ => AIError::provider_unavailable(format!("OpenAI API error: {}", status)),
        }
    }

    /// Map a client error, reporting timeouts with the configured limit
    fn transport_error(&self, err: reqwest::Error) -> AIError {
        if err.is_timeout() {
            AIError::timeout(self.request_timeout)
        } else {
            AIError::from(err)
        }
    }

    /// Pull the first choice's text out of a response body
    fn extract_content(body: &str) -> AIResult<String> {
        let response: OpenAIResponse = serde_json::from_str(body)
            .map_err(|e| AIError::invalid_response(format!("Failed to parse OpenAI response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AIError::invalid_response("No choices in OpenAI response"))
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> AIResult<String> {
        let body = OpenAIRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: self.create_messages(&request.system_prompt, &request.user_prompt),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!("Sending completion request to {} (model {})", self.endpoint(), body.model);

        let response = timeout(
            self.request_timeout,
            self.client
                .post(self.endpoint())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| AIError::timeout(self.request_timeout))?
        .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(self.error_for_status(status.as_u16(), &text));
        }

        Self::extract_content(&text)
    }
}
