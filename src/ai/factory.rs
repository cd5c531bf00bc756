//! Factory for building the triage service from configuration

use crate::ai::classifier::{Classifier, ModelBackedClassifier};
use crate::ai::config::{AIConfig, AIProviderType, BackendSelection};
use crate::ai::error::{AIError, AIResult};
use crate::ai::pipeline::TriageService;
use crate::ai::provider::AIProvider;
use crate::ai::providers::OpenAIProvider;
use crate::ai::responder::ResponseGenerator;
use std::sync::Arc;

/// Factory for creating AI providers and services
pub struct AIFactory;

impl AIFactory {
    /// Build the triage service for `config`.
    ///
    /// The backend is chosen once here. If the provider cannot be built the
    /// service runs on rules and templates.
    pub fn create_triage_service(config: &AIConfig) -> TriageService {
        let service = match Self::create_provider(config) {
            Ok(Some(provider)) => Self::create_model_service(provider, config),
            Ok(None) => TriageService::rules_only(),
            Err(e) => {
                tracing::warn!("Failed to initialize {} provider, using rules: {}", config.provider, e);
                TriageService::rules_only()
            }
        };
        service.with_batch_concurrency(config.batch_concurrency)
    }

    /// Build a model-backed service around an existing provider
    pub fn create_model_service(provider: Arc<dyn AIProvider>, config: &AIConfig) -> TriageService {
        let classifier = Classifier::with_model(ModelBackedClassifier::from_config(provider.clone(), config));
        let responder = ResponseGenerator::with_model(provider, config);
        TriageService::new(classifier, responder).with_batch_concurrency(config.batch_concurrency)
    }

    /// Provider for the configured backend, `None` for the rules-only path
    pub fn create_provider(config: &AIConfig) -> AIResult<Option<Arc<dyn AIProvider>>> {
        match config.backend_selection() {
            BackendSelection::NoBackend => Ok(None),
            BackendSelection::ModelBackend { model_id, .. } => {
                config.validate()?;
                let provider = Self::create_openai_provider(config)?;
                tracing::info!("Registered OpenAI provider with model {}", model_id);
                Ok(Some(Arc::new(provider)))
            }
        }
    }

    /// Create OpenAI provider
    fn create_openai_provider(config: &AIConfig) -> AIResult<OpenAIProvider> {
        OpenAIProvider::from_config(config)
    }

    /// Validate that `config` selects a usable model backend
    pub fn validate_config(config: &AIConfig) -> AIResult<()> {
        config.validate()?;

        match config.provider {
            AIProviderType::OpenAI => {
                if !config.backend_selection().is_model_backend() {
                    return Err(AIError::config_error("OpenAI API key not configured"));
                }
            }
            AIProviderType::None => {
                return Err(AIError::config_error("No AI provider selected"));
            }
        }

        Ok(())
    }
}
