//! End-to-end triage: validate, normalize, classify, reply

use crate::ai::classifier::{Classification, ClassificationMethod, Classifier};
use crate::ai::error::{TriageError, TriageResult};
use crate::ai::responder::ResponseGenerator;
use crate::email::{normalize, EmailFeatures, EmailText};
use futures::future::join_all;
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Outcome of triaging one email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub original_text: String,
    pub category: Classification,
    pub suggested_response: String,
    pub confidence: f32,
    pub method: ClassificationMethod,
    pub features: EmailFeatures,
    /// Seconds, rounded to milliseconds
    pub processing_time: f64,
}

/// One entry of a batch; failures stay local to their index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Success {
        index: usize,
        #[serde(flatten)]
        outcome: TriageOutcome,
    },
    Failure {
        index: usize,
        error: String,
    },
}

impl BatchItem {
    pub fn index(&self) -> usize {
        match self {
            BatchItem::Success { index, .. } | BatchItem::Failure { index, .. } => *index,
        }
    }

    pub fn outcome(&self) -> Option<&TriageOutcome> {
        match self {
            BatchItem::Success { outcome, .. } => Some(outcome),
            BatchItem::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BatchItem::Failure { error, .. } => Some(error),
            BatchItem::Success { .. } => None,
        }
    }
}

/// Static health payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub backend: String,
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "falha inesperada".to_string())
}

/// Triage service shared by every request.
///
/// Holds no per-request state; concurrent calls do not interfere.
#[derive(Debug, Clone)]
pub struct TriageService {
    classifier: Classifier,
    responder: ResponseGenerator,
    batch_concurrency: usize,
}

impl TriageService {
    pub fn new(classifier: Classifier, responder: ResponseGenerator) -> Self {
        Self {
            classifier,
            responder,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Cap on emails triaged at once by [`TriageService::triage_batch`]
    pub fn with_batch_concurrency(mut self, limit: usize) -> Self {
        self.batch_concurrency = limit.max(1);
        self
    }

    pub fn batch_concurrency(&self) -> usize {
        self.batch_concurrency
    }

    /// Rules and templates only
    pub fn rules_only() -> Self {
        Self::new(Classifier::rules_only(), ResponseGenerator::templates_only())
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn responder(&self) -> &ResponseGenerator {
        &self.responder
    }

    /// Triage one email with an entropy-seeded template choice.
    ///
    /// A panic anywhere in the pipeline is reported as
    /// [`TriageError::Internal`].
    pub async fn triage(&self, raw: &str) -> TriageResult<TriageOutcome> {
        let mut rng = StdRng::from_entropy();
        match AssertUnwindSafe(self.triage_with_rng(raw, &mut rng))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("Triage failed unexpectedly: {}", message);
                Err(TriageError::internal(message))
            }
        }
    }

    /// Triage one email drawing template choices from `rng`.
    ///
    /// Empty or whitespace-only input is rejected before classification.
    pub async fn triage_with_rng<R>(&self, raw: &str, rng: &mut R) -> TriageResult<TriageOutcome>
    where
        R: Rng + Send + ?Sized,
    {
        let started = Instant::now();
        let email = EmailText::parse(raw)?;

        let normalized = normalize(email.as_str());
        let classification = self.classifier.classify(&normalized).await;
        let suggested_response = self
            .responder
            .generate(email.as_str(), classification.category, rng)
            .await;

        let outcome = TriageOutcome {
            features: EmailFeatures::extract(email.as_str()),
            original_text: email.into_inner(),
            category: classification.category,
            suggested_response,
            confidence: classification.confidence,
            method: classification.method,
            processing_time: round_millis(started.elapsed().as_secs_f64()),
        };

        tracing::info!(
            "Triaged email as {} (confidence: {:.2}, {:.3}s)",
            outcome.category,
            outcome.confidence,
            outcome.processing_time
        );
        Ok(outcome)
    }

    /// Triage every email independently, reporting per-item errors in place.
    ///
    /// Emails run in chunks of `batch_concurrency` so a model backend never
    /// sees more than that many requests at once. Results keep input order.
    pub async fn triage_batch(&self, emails: &[String]) -> Vec<BatchItem> {
        let mut results = Vec::with_capacity(emails.len());

        for (chunk_index, chunk) in emails.chunks(self.batch_concurrency).enumerate() {
            let offset = chunk_index * self.batch_concurrency;
            let items = chunk.iter().enumerate().map(|(position, email)| {
                let index = offset + position;
                async move {
                    match self.triage(email).await {
                        Ok(outcome) => BatchItem::Success { index, outcome },
                        Err(e) => {
                            tracing::debug!("Batch item {} rejected: {}", index, e);
                            BatchItem::Failure {
                                index,
                                error: e.to_string(),
                            }
                        }
                    }
                }
            });

            results.extend(join_all(items).await);
        }

        results
    }

    pub fn health(&self) -> HealthStatus {
        let backend = if self.classifier.uses_model() {
            "model"
        } else {
            "rules"
        };

        HealthStatus {
            status: "healthy".to_string(),
            message: "Email triage service is running".to_string(),
            backend: backend.to_string(),
        }
    }
}
