//! Deterministic keyword classifier
//!
//! Always available and pure, so it doubles as the fallback whenever the
//! model backend is missing or fails.

use super::{Classification, ClassificationMethod, ClassificationResult};

/// Terms that point at correspondence needing follow-up
const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "suporte", "técnico", "problema", "erro", "bug", "falha",
    "solicitação", "pedido", "requisição", "dúvida", "questão",
    "status", "atualização", "andamento", "prazo", "urgente",
    "sistema", "aplicação", "funcionalidade", "recurso",
    "configuração", "instalação", "acesso", "login", "senha",
    "relatório", "dados", "informação", "documento", "arquivo",
];

/// Courtesy and social terms
const UNPRODUCTIVE_KEYWORDS: &[&str] = &[
    "parabéns", "felicitações", "aniversário", "natal", "ano novo",
    "feriado", "férias", "obrigado", "agradecimento", "grato",
    "bom dia", "boa tarde", "boa noite", "cumprimento",
    "convite", "evento", "festa", "reunião social", "coffee",
];

const REQUEST_WORDS: &[&str] = &["preciso", "gostaria", "poderia", "favor", "solicito"];

const PROBLEM_INDICATORS: &[&str] = &["não funciona", "erro", "problema", "falha"];

/// Added to the productive score when the text asks for something
const REQUEST_BONUS: u32 = 2;

const BASE_CONFIDENCE: f32 = 0.6;
const MARGIN_STEP: f32 = 0.1;
const MAX_CONFIDENCE: f32 = 0.9;

/// Lexical scores behind a rule-based decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleScores {
    pub productive: u32,
    pub unproductive: u32,
}

impl RuleScores {
    /// Score `text` against both lexicons, including the request bonus
    pub fn score(text: &str) -> Self {
        let lower = text.to_lowercase();
        let hits = |words: &[&str]| words.iter().filter(|word| lower.contains(*word)).count() as u32;

        let mut productive = hits(PRODUCTIVE_KEYWORDS);
        let unproductive = hits(UNPRODUCTIVE_KEYWORDS);

        let has_question = text.contains('?');
        let has_request = REQUEST_WORDS.iter().any(|word| lower.contains(word));
        let has_problem = PROBLEM_INDICATORS.iter().any(|word| lower.contains(word));

        if has_question || has_request || has_problem {
            productive += REQUEST_BONUS;
        }

        Self {
            productive,
            unproductive,
        }
    }

    /// Ties go to `Productive`; text with no signal at all goes to `Unproductive`
    pub fn decide(&self) -> Classification {
        if self.productive == 0 && self.unproductive == 0 {
            Classification::Unproductive
        } else if self.productive >= self.unproductive {
            Classification::Productive
        } else {
            Classification::Unproductive
        }
    }

    /// `min(0.9, 0.6 + 0.1 * margin)`
    pub fn confidence(&self) -> f32 {
        let margin = self.productive.abs_diff(self.unproductive) as f32;
        (BASE_CONFIDENCE + MARGIN_STEP * margin).min(MAX_CONFIDENCE)
    }
}

/// Keyword/heuristic classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify by keyword counts. Total and deterministic.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let scores = RuleScores::score(text);
        let category = scores.decide();

        tracing::debug!(
            "Rule scores - Produtivo: {}, Improdutivo: {} -> {}",
            scores.productive,
            scores.unproductive,
            category
        );

        ClassificationResult::new(category, scores.confidence(), ClassificationMethod::Rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> ClassificationResult {
        RuleBasedClassifier::new().classify(text)
    }

    #[test]
    fn test_support_request_is_productive() {
        let text = "Preciso de suporte técnico urgente, meu login não está funcionando.";
        let scores = RuleScores::score(text);
        assert!(scores.productive >= 4, "scores: {:?}", scores);

        let result = classify(text);
        assert_eq!(result.category, Classification::Productive);
        assert!(result.confidence >= 0.8);
        assert_eq!(result.method, ClassificationMethod::Rules);
    }

    #[test]
    fn test_holiday_thanks_is_unproductive() {
        let text = "Feliz Natal! Muito obrigado por tudo esse ano, parabéns pela equipe!";
        let scores = RuleScores::score(text);
        assert!(scores.unproductive >= 3);
        assert_eq!(scores.productive, 0);

        let result = classify(text);
        assert_eq!(result.category, Classification::Unproductive);
        assert!((result.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_neutral_text_defaults_to_unproductive() {
        let result = classify("lorem ipsum dolor sit amet");
        assert_eq!(result.category, Classification::Unproductive);
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_nonzero_tie_goes_to_productive() {
        // "obrigado" + "parabéns" against the question bonus
        let text = "obrigado e parabéns, tudo certo?";
        let scores = RuleScores::score(text);
        assert_eq!(scores, RuleScores { productive: 2, unproductive: 2 });

        let result = classify(text);
        assert_eq!(result.category, Classification::Productive);
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_bonus_applies_once() {
        // question mark, request word and problem phrase together still add 2
        let scores = RuleScores::score("poderia ver? não funciona");
        assert_eq!(scores.productive, 2);
    }

    #[test]
    fn test_confidence_is_capped() {
        let result = classify(
            "erro no sistema de login, senha e acesso com falha; preciso do relatório urgente",
        );
        assert_eq!(result.category, Classification::Productive);
        assert!((result.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let samples = [
            "",
            "?",
            "bom dia",
            "Qual o andamento do pedido 123?",
            "Convite para a festa de fim de ano",
            "status status status obrigado",
        ];

        for sample in samples {
            let first = classify(sample);
            let second = classify(sample);
            assert_eq!(first, second);
            assert!((0.6..=0.9).contains(&first.confidence), "{:?}", first);
        }
    }
}
