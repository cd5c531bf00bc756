//! Suggested reply generation

use crate::ai::classifier::Classification;
use crate::ai::config::AIConfig;
use crate::ai::provider::{AIProvider, CompletionRequest};
use crate::ai::templates::{ResponseTemplateBank, TemplateBucket};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

const RESPONSE_SYSTEM_PROMPT: &str = "Você é um assistente especializado em gerar respostas automáticas profissionais para emails corporativos. \
Suas respostas devem ser cordiais, profissionais e adequadas ao contexto do email recebido. \
Mantenha sempre um tom respeitoso e prestativo.";

/// Model settings for reply generation
#[derive(Clone)]
struct ModelReplies {
    provider: Arc<dyn AIProvider>,
    model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

/// Produces a suggested reply for a classified email.
///
/// With a backend, the model writes the reply and its text is returned as
/// is; without one, or when the call fails, a template is drawn uniformly
/// from the bucket matching the email's cues. Template output is therefore
/// not deterministic unless the caller pins the random source.
#[derive(Clone)]
pub struct ResponseGenerator {
    model: Option<ModelReplies>,
    templates: Arc<ResponseTemplateBank>,
}

impl ResponseGenerator {
    /// Template-only generator
    pub fn templates_only() -> Self {
        tracing::info!("Model backend not configured, using response templates");
        Self {
            model: None,
            templates: Arc::new(ResponseTemplateBank::new()),
        }
    }

    /// Model-backed generator with template fallback
    pub fn with_model(provider: Arc<dyn AIProvider>, config: &AIConfig) -> Self {
        tracing::info!("Using {} for response generation", provider.name());
        Self {
            model: Some(ModelReplies {
                provider,
                model: Some(config.response_model.clone()),
                temperature: config.response_temperature,
                max_tokens: config.response_max_tokens,
            }),
            templates: Arc::new(ResponseTemplateBank::new()),
        }
    }

    pub fn template_bank(&self) -> &ResponseTemplateBank {
        &self.templates
    }

    pub fn uses_model(&self) -> bool {
        self.model.is_some()
    }

    fn build_prompt(email: &str, category: Classification) -> String {
        format!(
            "Gere uma resposta automática profissional e adequada para o seguinte email classificado como \"{category}\":\n\n\
             Email original: \"{email}\"\n\n\
             Diretrizes:\n\
             - Para emails \"Produtivos\": Confirme o recebimento, indique que a solicitação será analisada e dê um prazo estimado\n\
             - Para emails \"Improdutivos\": Seja cordial, agradeça pela mensagem e mantenha um tom amigável\n\
             - Use linguagem formal mas acolhedora\n\
             - Seja conciso (máximo 3 frases)\n\
             - Inclua uma saudação apropriada\n\n\
             Resposta:"
        )
    }

    /// Generate a reply for `email` classified as `category`
    pub async fn generate<R>(&self, email: &str, category: Classification, rng: &mut R) -> String
    where
        R: Rng + Send + ?Sized,
    {
        if let Some(ref replies) = self.model {
            let mut request = CompletionRequest::new(
                RESPONSE_SYSTEM_PROMPT,
                Self::build_prompt(email, category),
            )
            .with_temperature(replies.temperature)
            .with_max_tokens(replies.max_tokens);
            if let Some(ref model) = replies.model {
                request = request.with_model(model.as_str());
            }

            match replies.provider.complete(&request).await {
                Ok(reply) => return reply.trim().to_string(),
                Err(e) => {
                    tracing::warn!("Model reply generation failed, using templates: {}", e);
                }
            }
        }

        self.from_template(email, category, rng).to_string()
    }

    /// Template path: pick the bucket from lexical cues, then a random entry
    pub fn from_template<R>(&self, email: &str, category: Classification, rng: &mut R) -> &'static str
    where
        R: Rng + ?Sized,
    {
        let bucket = TemplateBucket::select(email, category);
        tracing::debug!("Selected template bucket {:?} for {}", bucket, category);

        self.templates
            .templates(bucket)
            .choose(rng)
            .copied()
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("provider", &self.model.as_ref().map(|m| m.provider.name().to_string()))
            .finish()
    }
}
