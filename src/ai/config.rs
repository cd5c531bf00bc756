//! AI configuration management and backend selection

use crate::ai::error::{AIError, AIResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Placeholder shipped in sample `.env` files; treated as "no key".
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// AI provider types supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AIProviderType {
    /// OpenAI chat completions (or any compatible endpoint)
    OpenAI,
    /// No model backend - rules and templates only
    #[default]
    None,
}

impl std::fmt::Display for AIProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AIProviderType::OpenAI => write!(f, "OpenAI"),
            AIProviderType::None => write!(f, "None"),
        }
    }
}

/// Which classification/response path a service is built with.
///
/// Decided once from configuration; rebuilding the service is the only way
/// to change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    /// Rule-based classification and template replies only
    NoBackend,
    /// External text-generation model
    ModelBackend { credential: String, model_id: String },
}

impl BackendSelection {
    pub fn is_model_backend(&self) -> bool {
        matches!(self, BackendSelection::ModelBackend { .. })
    }
}

/// Triage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    /// Active AI provider
    pub provider: AIProviderType,

    /// API key for the provider
    pub api_key: Option<String>,

    /// Model used for classification
    pub model: String,

    /// Model used for reply generation
    pub response_model: String,

    /// Override for OpenAI-compatible endpoints
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Sampling temperature for classification (near-deterministic)
    pub classification_temperature: f32,

    /// Sampling temperature for reply generation
    pub response_temperature: f32,

    pub classification_max_tokens: u32,

    pub response_max_tokens: u32,

    /// Emails triaged at once in a batch
    pub batch_concurrency: usize,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            provider: AIProviderType::default(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            response_model: "gpt-3.5-turbo".to_string(),
            base_url: None,
            request_timeout_secs: 15,
            classification_temperature: 0.0,
            response_temperature: 0.3,
            classification_max_tokens: 200,
            response_max_tokens: 200,
            batch_concurrency: 4,
        }
    }
}

impl AIConfig {
    /// Create a new AI configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// A usable API key switches the provider to OpenAI; a missing or
    /// placeholder key leaves the rules-only path selected.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() && key != PLACEHOLDER_API_KEY {
                self.api_key = Some(key);
                self.provider = AIProviderType::OpenAI;
            }
        }

        if let Some(model) = lookup("OPENAI_CUSTOM_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model.trim().to_string();
        }

        if let Some(model) = lookup("OPENAI_RESPONSE_MODEL").filter(|m| !m.trim().is_empty()) {
            self.response_model = model.trim().to_string();
        }

        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(base_url.trim().to_string());
        }

        if let Some(secs) = lookup("TRIAGEM_REQUEST_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid TRIAGEM_REQUEST_TIMEOUT_SECS: {}", secs),
            }
        }
    }

    /// Load configuration from file, falling back to defaults when absent
    pub async fn load_from_file(path: &Path) -> AIResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AIError::config_error(format!("Failed to read config: {}", e)))?;

        let config: AIConfig = toml::from_str(&content)
            .map_err(|e| AIError::config_error(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> AIResult<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| AIError::config_error(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AIError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| AIError::config_error(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> AIResult<()> {
        for (name, value) in [
            ("Classification temperature", self.classification_temperature),
            ("Response temperature", self.response_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(AIError::config_error(format!(
                    "{} must be between 0.0 and 2.0",
                    name
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(AIError::config_error("Request timeout must be greater than 0"));
        }

        if self.classification_max_tokens == 0 || self.response_max_tokens == 0 {
            return Err(AIError::config_error("Max tokens must be greater than 0"));
        }

        if self.batch_concurrency == 0 {
            return Err(AIError::config_error("Batch concurrency must be greater than 0"));
        }

        if self.model.trim().is_empty() || self.response_model.trim().is_empty() {
            return Err(AIError::config_error("Model identifier cannot be empty"));
        }

        if let Some(ref base_url) = self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| AIError::config_error(format!("Invalid base URL: {}", e)))?;
        }

        Ok(())
    }

    /// Resolve which path the service runs on
    pub fn backend_selection(&self) -> BackendSelection {
        match (self.provider, self.api_key.as_deref()) {
            (AIProviderType::OpenAI, Some(key)) if !key.is_empty() && key != PLACEHOLDER_API_KEY => {
                BackendSelection::ModelBackend {
                    credential: key.to_string(),
                    model_id: self.model.clone(),
                }
            }
            _ => BackendSelection::NoBackend,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Copy of this configuration with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api_key = copy.api_key.as_ref().map(|key| {
            let visible: String = key.chars().take(3).collect();
            format!("{}***", visible)
        });
        copy
    }
}
