//! Productive/unproductive email classification
//!
//! [`Classifier`] picks between the model backend and the keyword rules and
//! always produces a [`ClassificationResult`]: backend failures are logged
//! and answered by the rules instead.

pub mod model;
pub mod parse;
pub mod rules;

pub use model::{interpret_completion, ModelBackedClassifier};
pub use rules::{RuleBasedClassifier, RuleScores};

use serde::{Deserialize, Serialize};

/// Whether an email requires action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Requires a follow-up action or response
    #[serde(rename = "Produtivo")]
    Productive,
    /// Social or courtesy message, no action needed
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Productive => "Produtivo",
            Classification::Unproductive => "Improdutivo",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a result, and so which confidence range applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Keyword rules, confidence in [0.6, 0.9]
    Rules,
    /// Model returned JSON with its own confidence, clamped to [0.1, 1.0]
    ModelStructured,
    /// Model returned free text, confidence computed in [0.70, 0.95]
    ModelHeuristic,
}

/// Category and confidence from a single classification.
///
/// The confidence is a heuristic certainty score, not a calibrated
/// probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Classification,
    pub confidence: f32,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    pub fn new(category: Classification, confidence: f32, method: ClassificationMethod) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.1, 1.0),
            method,
        }
    }

    pub fn is_productive(&self) -> bool {
        self.category == Classification::Productive
    }
}

#[derive(Debug, Clone)]
enum ClassifierPath {
    Rules,
    Model(ModelBackedClassifier),
}

/// Classification facade.
///
/// Holds only immutable configuration, so one instance can be shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Classifier {
    path: ClassifierPath,
    rules: RuleBasedClassifier,
}

impl Classifier {
    /// Rules only; used when no backend is configured
    pub fn rules_only() -> Self {
        tracing::info!("Model backend not configured, using rule-based classification");
        Self {
            path: ClassifierPath::Rules,
            rules: RuleBasedClassifier::new(),
        }
    }

    /// Model first, rules on any backend failure
    pub fn with_model(model: ModelBackedClassifier) -> Self {
        tracing::info!("Using {} for classification", model.provider_name());
        Self {
            path: ClassifierPath::Model(model),
            rules: RuleBasedClassifier::new(),
        }
    }

    pub fn uses_model(&self) -> bool {
        matches!(self.path, ClassifierPath::Model(_))
    }

    /// Classify `text`. Never fails.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        match &self.path {
            ClassifierPath::Rules => self.rules.classify(text),
            ClassifierPath::Model(model) => match model.classify(text).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Model classification failed, falling back to rules: {}", e);
                    self.rules.classify(text)
                }
            },
        }
    }
}
