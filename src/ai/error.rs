//! Error types for the model backend and for triage requests

use thiserror::Error;

/// Result type for model backend operations
pub type AIResult<T> = Result<T, AIError>;

/// Result type for triage requests
pub type TriageResult<T> = Result<T, TriageError>;

/// Failures of the external model backend.
///
/// None of these ever reach a triage caller: the classifier and the response
/// generator absorb them by falling back to rules and templates.
#[derive(Error, Debug, Clone)]
pub enum AIError {
    #[error("AI provider is unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Authentication failed: {provider}")]
    AuthenticationFailure { provider: String },

    #[error("Rate limit exceeded for provider: {provider}")]
    RateLimitExceeded { provider: String },

    #[error("Invalid response from AI provider: {details}")]
    InvalidResponse { details: String },

    #[error("AI configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("AI provider timeout after {timeout:?}")]
    Timeout { timeout: std::time::Duration },

    #[error("Insufficient API quota or credits for provider: {provider}")]
    InsufficientQuota { provider: String },

    #[error("Model not found: {model} for provider: {provider}")]
    ModelNotFound { model: String, provider: String },
}

impl AIError {
    /// Create a provider unavailable error
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        AIError::ProviderUnavailable {
            message: message.into(),
        }
    }

    /// Create an authentication failure error
    pub fn auth_failure(provider: impl Into<String>) -> Self {
        AIError::AuthenticationFailure {
            provider: provider.into(),
        }
    }

    /// Create a rate limit exceeded error
    pub fn rate_limit(provider: impl Into<String>) -> Self {
        AIError::RateLimitExceeded {
            provider: provider.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(details: impl Into<String>) -> Self {
        AIError::InvalidResponse {
            details: details.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        AIError::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network_error(message: impl Into<String>) -> Self {
        AIError::NetworkError {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout: std::time::Duration) -> Self {
        AIError::Timeout { timeout }
    }

    /// Create an insufficient quota error
    pub fn insufficient_quota(provider: impl Into<String>) -> Self {
        AIError::InsufficientQuota {
            provider: provider.into(),
        }
    }

    /// Create a model not found error
    pub fn model_not_found(model: impl Into<String>, provider: impl Into<String>) -> Self {
        AIError::ModelNotFound {
            model: model.into(),
            provider: provider.into(),
        }
    }
}

/// Timeouts carry no limit here; providers that know their limit map
/// `is_timeout()` themselves.
impl From<reqwest::Error> for AIError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            AIError::provider_unavailable(err.to_string())
        } else {
            AIError::network_error(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AIError {
    fn from(err: serde_json::Error) -> Self {
        AIError::invalid_response(format!("JSON parsing error: {}", err))
    }
}

/// Errors a triage caller can observe.
///
/// Input errors map to a client error (400) and are not logged as faults;
/// internal errors map to a server error (500).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("Email vazio ou inválido")]
    EmptyInput,

    #[error("Formato de arquivo não suportado: {filename}")]
    UnsupportedFormat { filename: String },

    #[error("Entrada inválida: {message}")]
    InvalidInput { message: String },

    /// Unexpected fault inside the pipeline, such as a panic
    #[error("Erro interno do servidor: {message}")]
    Internal { message: String },
}

impl TriageError {
    /// Create an unsupported format error
    pub fn unsupported_format(filename: impl Into<String>) -> Self {
        TriageError::UnsupportedFormat {
            filename: filename.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TriageError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        TriageError::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller supplied bad input (as opposed to a server fault)
    pub fn is_input_error(&self) -> bool {
        !matches!(self, TriageError::Internal { .. })
    }

    /// HTTP status an HTTP front end should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_input_error() {
            400
        } else {
            500
        }
    }
}
