//! End-to-end triage tests using the public API only

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use triagem::ai::{
    AIConfig, AIError, AIFactory, AIProvider, AIResult, BatchItem, Classification,
    ClassificationMethod, CompletionRequest, TriageError, TriageService,
};

/// Provider answering every completion with a fixed script
struct ScriptedProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn unavailable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AIProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _request: &CompletionRequest) -> AIResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AIError::provider_unavailable("scripted outage"))
    }
}

fn rules_service() -> TriageService {
    AIFactory::create_triage_service(&AIConfig::default())
}

#[tokio::test]
async fn test_support_request_is_productive() {
    let outcome = rules_service()
        .triage("Preciso de suporte técnico urgente, meu login não está funcionando.")
        .await
        .unwrap();

    assert_eq!(outcome.category, Classification::Productive);
    assert!(outcome.confidence >= 0.8);
    assert!(!outcome.suggested_response.is_empty());
}

#[tokio::test]
async fn test_holiday_greeting_is_unproductive() {
    let service = rules_service();
    let outcome = service
        .triage_with_rng(
            "Feliz Natal! Muito obrigado por tudo esse ano, parabéns pela equipe!",
            &mut StdRng::seed_from_u64(11),
        )
        .await
        .unwrap();

    assert_eq!(outcome.category, Classification::Unproductive);
    assert!(service
        .responder()
        .template_bank()
        .contains(Classification::Unproductive, &outcome.suggested_response));
}

#[tokio::test]
async fn test_empty_email_rejected_before_backend() {
    let provider = Arc::new(ScriptedProvider::replying("Classificação: Produtivo"));
    let service = AIFactory::create_model_service(provider.clone(), &AIConfig::default());

    let err = service.triage("").await.unwrap_err();
    assert_eq!(err, TriageError::EmptyInput);
    assert!(err.is_input_error());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_batch_reports_each_item() {
    let emails: Vec<String> = ["urgente problema", "obrigado parabéns", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let results = rules_service().triage_batch(&emails).await;
    assert_eq!(results.len(), 3);

    match &results[0] {
        BatchItem::Success { index, outcome } => {
            assert_eq!(*index, 0);
            assert_eq!(outcome.category, Classification::Productive);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &results[1] {
        BatchItem::Success { index, outcome } => {
            assert_eq!(*index, 1);
            assert_eq!(outcome.category, Classification::Unproductive);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &results[2] {
        BatchItem::Failure { index, error } => {
            assert_eq!(*index, 2);
            assert_eq!(error, "Email vazio ou inválido");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_unmarked_completion_goes_to_weighted_scorer() {
    let provider = Arc::new(ScriptedProvider::replying(
        "Recebemos sua mensagem e vamos verificar os detalhes do contrato ainda nesta semana.",
    ));
    let service = AIFactory::create_model_service(provider, &AIConfig::default());

    let outcome = service
        .triage("Vocês podem revisar o contrato enviado?")
        .await
        .unwrap();

    assert_eq!(outcome.category, Classification::Productive);
    assert_eq!(outcome.method, ClassificationMethod::ModelHeuristic);
    assert!((0.70..=0.95).contains(&outcome.confidence));
}

#[tokio::test]
async fn test_backend_outage_degrades_to_rules_and_templates() {
    let provider = Arc::new(ScriptedProvider::unavailable());
    let service = AIFactory::create_model_service(provider.clone(), &AIConfig::default());

    let outcome = service.triage("Qual o status do meu pedido?").await.unwrap();

    assert_eq!(outcome.method, ClassificationMethod::Rules);
    assert_eq!(outcome.category, Classification::Productive);
    assert!(service
        .responder()
        .template_bank()
        .contains(Classification::Productive, &outcome.suggested_response));
    // one classification call and one reply call
    assert_eq!(provider.calls(), 2);
}

#[test]
fn test_outcome_json_shape() {
    let outcome = tokio_test::block_on(rules_service().triage("Obrigado pela ajuda!")).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["category"], "Improdutivo");
    assert_eq!(json["method"], "rules");
    assert_eq!(json["original_text"], "Obrigado pela ajuda!");
    assert_eq!(json["features"]["has_thanks"], true);
    assert!(json["processing_time"].as_f64().unwrap() >= 0.0);
}
