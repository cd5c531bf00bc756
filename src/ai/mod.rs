//! Email triage AI module
//!
//! Classifies incoming emails as productive or unproductive and suggests a
//! reply, using an OpenAI-compatible model when one is configured and
//! keyword rules plus canned templates otherwise.

pub mod classifier;
pub mod config;
pub mod error;
pub mod factory;
pub mod pipeline;
pub mod provider;
pub mod providers;
pub mod responder;
pub mod templates;

#[cfg(test)]
pub mod testing;

// Re-export main types for convenient access
pub use classifier::{
    Classification, ClassificationMethod, ClassificationResult, Classifier, ModelBackedClassifier,
    RuleBasedClassifier,
};
pub use config::{AIConfig, AIProviderType, BackendSelection};
pub use error::{AIError, AIResult, TriageError, TriageResult};
pub use factory::AIFactory;
pub use pipeline::{BatchItem, HealthStatus, TriageOutcome, TriageService};
pub use provider::{AIProvider, CompletionRequest};
pub use providers::OpenAIProvider;
pub use responder::ResponseGenerator;
pub use templates::{ResponseTemplateBank, TemplateBucket};
