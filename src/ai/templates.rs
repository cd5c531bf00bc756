//! Canned replies keyed by classification and lexical sub-category

use crate::ai::classifier::Classification;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lexical sub-category an email falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateBucket {
    TechnicalSupport,
    StatusRequest,
    Question,
    DocumentRequest,
    ProductiveGeneral,
    Thanks,
    Congratulations,
    Holidays,
    UnproductiveGeneral,
}

/// Cue lists in priority order; the first bucket with a hit wins.
const PRODUCTIVE_CUES: &[(TemplateBucket, &[&str])] = &[
    (TemplateBucket::TechnicalSupport, &["suporte", "técnico", "problema", "erro", "bug"]),
    (TemplateBucket::StatusRequest, &["status", "andamento", "atualização"]),
    (TemplateBucket::Question, &["dúvida", "questão", "pergunta"]),
    (TemplateBucket::DocumentRequest, &["documento", "arquivo", "relatório"]),
];

const UNPRODUCTIVE_CUES: &[(TemplateBucket, &[&str])] = &[
    (TemplateBucket::Thanks, &["obrigado", "agradecimento", "grato"]),
    (TemplateBucket::Congratulations, &["parabéns", "felicitações", "aniversário"]),
    (TemplateBucket::Holidays, &["natal", "ano novo", "feriado"]),
];

impl TemplateBucket {
    /// Buckets reachable for a classification
    pub fn for_classification(category: Classification) -> &'static [TemplateBucket] {
        match category {
            Classification::Productive => &[
                TemplateBucket::TechnicalSupport,
                TemplateBucket::StatusRequest,
                TemplateBucket::Question,
                TemplateBucket::DocumentRequest,
                TemplateBucket::ProductiveGeneral,
            ],
            Classification::Unproductive => &[
                TemplateBucket::Thanks,
                TemplateBucket::Congratulations,
                TemplateBucket::Holidays,
                TemplateBucket::UnproductiveGeneral,
            ],
        }
    }

    /// Pick the bucket for an email from its lexical cues
    pub fn select(email: &str, category: Classification) -> Self {
        let lower = email.to_lowercase();
        let (cues, general) = match category {
            Classification::Productive => (PRODUCTIVE_CUES, TemplateBucket::ProductiveGeneral),
            Classification::Unproductive => (UNPRODUCTIVE_CUES, TemplateBucket::UnproductiveGeneral),
        };

        cues.iter()
            .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
            .map(|(bucket, _)| *bucket)
            .unwrap_or(general)
    }
}

/// Immutable reply bank, shared read-only by every request
#[derive(Debug, Clone)]
pub struct ResponseTemplateBank {
    buckets: HashMap<TemplateBucket, Vec<&'static str>>,
}

impl Default for ResponseTemplateBank {
    fn default() -> Self {
        let buckets = HashMap::from([
            (
                TemplateBucket::TechnicalSupport,
                vec![
                    "Obrigado por entrar em contato conosco. Recebemos sua solicitação de suporte técnico e nossa equipe especializada já foi notificada. Retornaremos com uma solução em até 24 horas úteis.",
                    "Sua solicitação de suporte foi registrada com sucesso. Nossa equipe técnica está analisando o problema reportado e entrará em contato em breve com uma solução.",
                    "Agradecemos por reportar este problema técnico. Já encaminhamos sua solicitação para nossa equipe de desenvolvimento e você receberá uma resposta detalhada em breve.",
                ],
            ),
            (
                TemplateBucket::StatusRequest,
                vec![
                    "Obrigado por sua solicitação de atualização. Estamos verificando o status atual de sua requisição e retornaremos com informações detalhadas em breve.",
                    "Recebemos sua solicitação de status. Nossa equipe está compilando as informações mais recentes e enviaremos um relatório completo nas próximas horas.",
                    "Sua solicitação de atualização foi recebida. Estamos consultando os responsáveis pelo projeto e retornaremos com o status atual em breve.",
                ],
            ),
            (
                TemplateBucket::Question,
                vec![
                    "Obrigado por sua pergunta. Nossa equipe está analisando sua dúvida e retornará com uma resposta detalhada em breve.",
                    "Recebemos sua questão e já a encaminhamos para o especialista responsável. Você receberá uma resposta completa nas próximas horas.",
                    "Agradecemos por entrar em contato. Sua dúvida está sendo analisada por nossa equipe e retornaremos com esclarecimentos em breve.",
                ],
            ),
            (
                TemplateBucket::DocumentRequest,
                vec![
                    "Sua solicitação de documento foi recebida. Estamos preparando os arquivos solicitados e os enviaremos em breve.",
                    "Obrigado por sua solicitação. Os documentos estão sendo compilados e você os receberá nas próximas horas.",
                    "Recebemos sua solicitação de documentação. Nossa equipe está organizando os arquivos e os enviará em breve.",
                ],
            ),
            (
                TemplateBucket::ProductiveGeneral,
                vec![
                    "Obrigado por entrar em contato conosco. Sua solicitação foi recebida e nossa equipe retornará em breve com as informações necessárias.",
                    "Recebemos sua mensagem e já a encaminhamos para o departamento responsável. Retornaremos com uma resposta em breve.",
                    "Agradecemos por seu contato. Sua solicitação está sendo analisada e você receberá uma resposta detalhada nas próximas horas.",
                ],
            ),
            (
                TemplateBucket::Thanks,
                vec![
                    "Muito obrigado por suas palavras gentis! Ficamos felizes em poder ajudar. Estamos sempre à disposição.",
                    "Agradecemos imensamente por seu feedback positivo. É um prazer trabalhar com você!",
                    "Suas palavras de agradecimento são muito importantes para nós. Obrigado por reconhecer nosso trabalho!",
                ],
            ),
            (
                TemplateBucket::Congratulations,
                vec![
                    "Muito obrigado pelas felicitações! Ficamos honrados com suas palavras gentis.",
                    "Agradecemos imensamente por suas felicitações. Suas palavras são muito importantes para nós!",
                    "Obrigado pelas parabenizações! É sempre um prazer receber mensagens tão positivas.",
                ],
            ),
            (
                TemplateBucket::Holidays,
                vec![
                    "Muito obrigado pelos votos de boas festas! Desejamos a você e sua família momentos de muita alegria e prosperidade.",
                    "Agradecemos pelos cumprimentos festivos! Que este período seja repleto de paz e felicidade para você.",
                    "Obrigado pelas felicitações! Desejamos que você tenha festividades maravilhosas ao lado de quem ama.",
                ],
            ),
            (
                TemplateBucket::UnproductiveGeneral,
                vec![
                    "Obrigado por sua mensagem! Ficamos felizes em receber seu contato. Tenha um excelente dia!",
                    "Agradecemos por entrar em contato conosco. Sua mensagem é muito importante para nós!",
                    "Muito obrigado por sua mensagem gentil. Estamos sempre à disposição quando precisar!",
                ],
            ),
        ]);

        Self { buckets }
    }
}

impl ResponseTemplateBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate replies for a bucket
    pub fn templates(&self, bucket: TemplateBucket) -> &[&'static str] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `reply` is one of the canned replies for `category`
    pub fn contains(&self, category: Classification, reply: &str) -> bool {
        TemplateBucket::for_classification(category)
            .iter()
            .any(|bucket| self.templates(*bucket).contains(&reply))
    }
}
