//! Classification through the external text-generation backend

use super::parse::{
    heuristic_confidence, parse_line_prefix, parse_marker_phrases, parse_structured,
    score_weighted, LinePrefix,
};
use super::{ClassificationMethod, ClassificationResult};
use crate::ai::config::AIConfig;
use crate::ai::error::AIResult;
use crate::ai::provider::{AIProvider, CompletionRequest};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "Você é um assistente especializado em classificar emails bancários como Produtivo (requer ação) ou Improdutivo (não requer ação) e sugerir respostas apropriadas.";

/// Turn a completion into a result, trying each parsing stage in order.
///
/// `email` is only used for the heuristic confidence of unstructured
/// completions.
pub fn interpret_completion(completion: &str, email: &str) -> ClassificationResult {
    if let Some((category, confidence)) = parse_structured(completion) {
        tracing::info!("Model classified as: {} (confidence: {:.2})", category, confidence);
        return ClassificationResult::new(category, confidence, ClassificationMethod::ModelStructured);
    }

    let preview: String = completion.chars().take(100).collect();
    tracing::debug!("Unstructured completion: {}...", preview);

    let category = match parse_line_prefix(completion) {
        LinePrefix::Matched(category) => category,
        LinePrefix::Unrecognized => score_weighted(completion),
        LinePrefix::Absent => {
            parse_marker_phrases(completion).unwrap_or_else(|| score_weighted(completion))
        }
    };
    let confidence = heuristic_confidence(email);

    tracing::info!(
        "Model classified as: {} (computed confidence: {:.2})",
        category,
        confidence
    );
    ClassificationResult::new(category, confidence, ClassificationMethod::ModelHeuristic)
}

/// Classifier that asks the model backend and parses whatever comes back
#[derive(Clone)]
pub struct ModelBackedClassifier {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl ModelBackedClassifier {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: 0.0,
            max_tokens: 200,
        }
    }

    pub fn from_config(provider: Arc<dyn AIProvider>, config: &AIConfig) -> Self {
        Self {
            provider,
            temperature: config.classification_temperature,
            max_tokens: config.classification_max_tokens,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn build_request(&self, text: &str) -> CompletionRequest {
        CompletionRequest::new(
            SYSTEM_PROMPT,
            format!("Classifique este email e sugira uma resposta: {}", text),
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens)
    }

    /// Classify via the backend.
    ///
    /// Fails only when the backend call itself fails; any completion text
    /// yields a result.
    pub async fn classify(&self, text: &str) -> AIResult<ClassificationResult> {
        let completion = self.provider.complete(&self.build_request(text)).await?;
        Ok(interpret_completion(&completion, text))
    }
}

impl std::fmt::Debug for ModelBackedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBackedClassifier")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
