//! Parsing of free-form model completions into a classification.
//!
//! Each stage is a standalone function over the completion text. The model
//! classifier tries them in order: structured JSON, a `classificação:`
//! first line, marker phrases anywhere, and finally the weighted scorer,
//! which always produces an answer. A prefixed first line naming no known
//! class goes straight to the scorer.

use super::Classification;
use serde::Deserialize;

/// Range a model-reported confidence is clamped into
pub const REPORTED_CONFIDENCE_RANGE: (f32, f32) = (0.1, 1.0);

/// Range of the confidence computed for unstructured completions
pub const HEURISTIC_CONFIDENCE_RANGE: (f32, f32) = (0.70, 0.95);

/// Used when a JSON completion omits its confidence
const DEFAULT_REPORTED_CONFIDENCE: f32 = 0.8;

const UNPRODUCTIVE_MARKERS: &[&str] = &["improdutivo", "unproductive"];
const PRODUCTIVE_MARKERS: &[&str] = &["produtivo", "productive"];

const JUSTIFICATION_PRODUCTIVE_WORDS: &[&str] = &["produtivo", "ação", "resposta", "suporte"];

const LINE_PREFIXES: &[&str] = &["classificação:", "classificacao:", "classification:"];

const UNPRODUCTIVE_PHRASES: &[&str] = &[
    "classificação: improdutivo",
    "classificacao: improdutivo",
    "email improdutivo",
    "improdutivo.",
];

const PRODUCTIVE_PHRASES: &[&str] = &[
    "classificação: produtivo",
    "classificacao: produtivo",
    "email produtivo",
    "produtivo.",
];

const STRONG_UNPRODUCTIVE: &[&str] = &[
    "obrigado", "agradecemos", "felizes", "parabéns", "reconhecimento",
    "feedback positivo", "elogios", "satisfação", "gratidão", "felicitações",
];

const STRONG_PRODUCTIVE: &[&str] = &[
    "verificar", "analisar", "resolver", "providenciar", "processar",
    "encaminhar", "agendar", "solicitar", "atualização", "protocolo",
];

const UNPRODUCTIVE_CHARACTERISTIC: &[&str] = &[
    "ficamos felizes", "muito obrigado", "feedback é importante",
    "continuamos à disposição", "agradecemos o contato",
    "como posso ajudar", "olá!", "bom dia!", "boa tarde!",
];

const PRODUCTIVE_CHARACTERISTIC: &[&str] = &[
    "vamos verificar", "nossa equipe", "entrar em contato",
    "providenciar", "em até", "dias úteis", "processar",
    "para resolver", "vamos analisar",
];

const STRONG_WEIGHT: u32 = 2;
const PHRASE_WEIGHT: u32 = 3;

/// A bare "how can I help" greeting is pushed towards unproductive
const GREETING_PHRASE: &str = "como posso ajudar";
const GREETING_MAX_WORDS: usize = 8;
const GREETING_ACTION_VERBS: &[&str] = &["verificar", "analisar", "resolver"];
const GREETING_OVERRIDE_WEIGHT: u32 = 5;

const HEURISTIC_BASE: f32 = 0.85;
const CLARITY_BONUS: f32 = 0.05;
const AMBIGUITY_PENALTY: f32 = 0.08;
const CLARITY_INDICATORS: &[&str] = &[
    "obrigado", "parabéns", "felicitações",
    "preciso", "gostaria", "solicito", "problema",
];

/// JSON shape a well-behaved model returns
#[derive(Debug, Deserialize)]
struct StructuredVerdict {
    #[serde(default, alias = "classificacao")]
    classification: String,
    #[serde(default, alias = "confianca")]
    confidence: Option<f32>,
    #[serde(default, alias = "justificativa")]
    justification: String,
}

fn clamp(value: f32, (low, high): (f32, f32)) -> f32 {
    value.clamp(low, high)
}

/// Look for a class marker inside `text`, checking the unproductive marker
/// first since it contains the productive one.
fn marker_in(text: &str) -> Option<Classification> {
    let lower = text.to_lowercase();
    if UNPRODUCTIVE_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(Classification::Unproductive)
    } else if PRODUCTIVE_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(Classification::Productive)
    } else {
        None
    }
}

/// Drop a surrounding ```json / ``` fence
fn strip_code_fence(completion: &str) -> &str {
    let trimmed = completion.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Stage 1: JSON with `classification`, `confidence` and `justification`.
///
/// Returns `None` when the completion is not such a JSON object. The
/// confidence is clamped to [0.1, 1.0].
pub fn parse_structured(completion: &str) -> Option<(Classification, f32)> {
    let verdict: StructuredVerdict = serde_json::from_str(strip_code_fence(completion)).ok()?;

    let category = marker_in(&verdict.classification).unwrap_or_else(|| {
        let justification = verdict.justification.to_lowercase();
        if JUSTIFICATION_PRODUCTIVE_WORDS
            .iter()
            .any(|word| justification.contains(word))
        {
            Classification::Productive
        } else {
            Classification::Unproductive
        }
    });

    let confidence = clamp(
        verdict.confidence.unwrap_or(DEFAULT_REPORTED_CONFIDENCE),
        REPORTED_CONFIDENCE_RANGE,
    );

    Some((category, confidence))
}

/// What the first line of a completion says about the class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePrefix {
    /// `Classificação: <class>` with a recognizable class
    Matched(Classification),
    /// The prefix is there but names no known class
    Unrecognized,
    /// No classification prefix on the first line
    Absent,
}

/// Stage 2: a first line such as `Classificação: Produtivo`.
///
/// An unrecognized value after the prefix sends the completion straight to
/// the weighted scorer, skipping the marker phrases.
pub fn parse_line_prefix(completion: &str) -> LinePrefix {
    let Some(first_line) = completion.trim().lines().next() else {
        return LinePrefix::Absent;
    };
    let first_line = first_line.to_lowercase();

    let after_prefix = LINE_PREFIXES
        .iter()
        .find_map(|prefix| first_line.split_once(prefix).map(|(_, rest)| rest));

    match after_prefix {
        Some(rest) => marker_in(rest).map_or(LinePrefix::Unrecognized, LinePrefix::Matched),
        None => LinePrefix::Absent,
    }
}

/// Stage 3: fixed marker phrases anywhere in the completion
pub fn parse_marker_phrases(completion: &str) -> Option<Classification> {
    let lower = completion.to_lowercase();

    if UNPRODUCTIVE_PHRASES.iter().any(|p| lower.contains(p)) {
        Some(Classification::Unproductive)
    } else if PRODUCTIVE_PHRASES.iter().any(|p| lower.contains(p)) {
        Some(Classification::Productive)
    } else {
        None
    }
}

/// Weighted indicator scores for a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorScores {
    pub productive: u32,
    pub unproductive: u32,
}

impl IndicatorScores {
    pub fn score(completion: &str) -> Self {
        let lower = completion.to_lowercase();
        let weigh = |words: &[&str], weight: u32| {
            words.iter().filter(|word| lower.contains(*word)).count() as u32 * weight
        };

        let mut unproductive =
            weigh(STRONG_UNPRODUCTIVE, STRONG_WEIGHT) + weigh(UNPRODUCTIVE_CHARACTERISTIC, PHRASE_WEIGHT);
        let productive =
            weigh(STRONG_PRODUCTIVE, STRONG_WEIGHT) + weigh(PRODUCTIVE_CHARACTERISTIC, PHRASE_WEIGHT);

        let is_bare_greeting = lower.contains(GREETING_PHRASE)
            && completion.split_whitespace().count() <= GREETING_MAX_WORDS
            && !GREETING_ACTION_VERBS.iter().any(|verb| lower.contains(verb));

        if is_bare_greeting {
            unproductive += GREETING_OVERRIDE_WEIGHT;
        }

        Self {
            productive,
            unproductive,
        }
    }
}

/// Stage 4: weighted scorer. Total; ties favor `Productive`.
pub fn score_weighted(completion: &str) -> Classification {
    let scores = IndicatorScores::score(completion);

    tracing::debug!(
        "Fallback analysis - Produtivo: {}, Improdutivo: {}",
        scores.productive,
        scores.unproductive
    );

    if scores.unproductive > scores.productive {
        Classification::Unproductive
    } else {
        Classification::Productive
    }
}

/// Confidence for completions that carried no usable number of their own.
///
/// Derived from the email, not the completion: base 0.85, +0.05 once for any
/// clarity indicator, -0.08 for a very short email and -0.08 when it has
/// neither a question mark nor "preciso". Clamped to [0.70, 0.95].
pub fn heuristic_confidence(email: &str) -> f32 {
    let lower = email.to_lowercase();
    let mut confidence = HEURISTIC_BASE;

    if CLARITY_INDICATORS.iter().any(|word| lower.contains(word)) {
        confidence += CLARITY_BONUS;
    }

    let very_short = email.split_whitespace().count() < 3;
    let no_ask = !email.contains('?') && !lower.contains("preciso");

    for ambiguous in [very_short, no_ask] {
        if ambiguous {
            confidence -= AMBIGUITY_PENALTY;
        }
    }

    clamp(confidence, HEURISTIC_CONFIDENCE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_plain_json() {
        let completion = r#"{"classification": "Produtivo", "confidence": 0.93}"#;
        assert_eq!(
            parse_structured(completion),
            Some((Classification::Productive, 0.93))
        );
    }

    #[test]
    fn test_structured_fenced_portuguese_fields() {
        let completion = "```json\n{\"classificacao\": \"Improdutivo\", \"confianca\": 0.7, \"justificativa\": \"mensagem de agradecimento\"}\n```";
        assert_eq!(
            parse_structured(completion),
            Some((Classification::Unproductive, 0.7))
        );
    }

    #[test]
    fn test_structured_clamps_confidence() {
        let high = r#"{"classification": "Productive", "confidence": 3.5}"#;
        assert_eq!(parse_structured(high), Some((Classification::Productive, 1.0)));

        let low = r#"{"classification": "Improdutivo", "confidence": -1}"#;
        assert_eq!(parse_structured(low), Some((Classification::Unproductive, 0.1)));

        let missing = r#"{"classification": "Produtivo"}"#;
        assert_eq!(parse_structured(missing), Some((Classification::Productive, 0.8)));
    }

    #[test]
    fn test_structured_falls_back_to_justification() {
        let productive = r#"{"classification": "?", "confidence": 0.6, "justificativa": "Requer ação da equipe de suporte"}"#;
        assert_eq!(
            parse_structured(productive).map(|(c, _)| c),
            Some(Classification::Productive)
        );

        let unproductive = r#"{"classification": "", "justification": "apenas cumprimentos"}"#;
        assert_eq!(
            parse_structured(unproductive).map(|(c, _)| c),
            Some(Classification::Unproductive)
        );
    }

    #[test]
    fn test_structured_rejects_non_json() {
        assert_eq!(parse_structured("Classificação: Produtivo"), None);
        assert_eq!(parse_structured(r#"{"classification": "Produtivo", "confidence": "alta"}"#), None);
        assert_eq!(parse_structured("[1, 2]"), None);
    }

    #[test]
    fn test_line_prefix() {
        assert_eq!(
            parse_line_prefix("Classificação: Improdutivo\nResposta: Obrigado!"),
            LinePrefix::Matched(Classification::Unproductive)
        );
        assert_eq!(
            parse_line_prefix("  classificacao: PRODUTIVO - requer retorno"),
            LinePrefix::Matched(Classification::Productive)
        );
        assert_eq!(parse_line_prefix("Classificação: indefinida"), LinePrefix::Unrecognized);
        assert_eq!(
            parse_line_prefix("Resposta sugerida\nClassificação: Produtivo"),
            LinePrefix::Absent
        );
        assert_eq!(parse_line_prefix("   "), LinePrefix::Absent);
    }

    #[test]
    fn test_marker_phrases() {
        assert_eq!(
            parse_marker_phrases("Trata-se de um email improdutivo, apenas felicitações."),
            Some(Classification::Unproductive)
        );
        assert_eq!(
            parse_marker_phrases("Resposta: ...\nEste é um email produtivo"),
            Some(Classification::Productive)
        );
        assert_eq!(parse_marker_phrases("Nada a declarar"), None);
    }

    #[test]
    fn test_weighted_scorer_action_reply() {
        let completion = "Olá, recebemos sua mensagem e vamos verificar o ocorrido com cuidado ainda hoje.";
        let scores = IndicatorScores::score(completion);
        assert_eq!(scores.productive, STRONG_WEIGHT + PHRASE_WEIGHT);
        assert_eq!(score_weighted(completion), Classification::Productive);
    }

    #[test]
    fn test_weighted_scorer_courtesy_reply() {
        let completion = "Muito obrigado pelas palavras, ficamos felizes com o reconhecimento.";
        assert_eq!(score_weighted(completion), Classification::Unproductive);
    }

    #[test]
    fn test_weighted_scorer_bare_greeting_override() {
        let scores = IndicatorScores::score("Olá! Como posso ajudar hoje?");
        // "olá!" and "como posso ajudar" phrases plus the greeting override
        assert_eq!(scores.unproductive, 2 * PHRASE_WEIGHT + GREETING_OVERRIDE_WEIGHT);
        assert_eq!(score_weighted("Olá! Como posso ajudar hoje?"), Classification::Unproductive);

        let with_verb = IndicatorScores::score("Como posso ajudar? Vou verificar agora.");
        assert_eq!(with_verb.unproductive, PHRASE_WEIGHT);
    }

    #[test]
    fn test_weighted_scorer_ties_favor_productive() {
        assert_eq!(score_weighted("texto sem indicadores"), Classification::Productive);
    }

    #[test]
    fn test_heuristic_confidence() {
        // clarity bonus, asks for something, long enough
        assert!((heuristic_confidence("Preciso do relatório mensal atualizado") - 0.90).abs() < 1e-6);
        // no bonus, no question, no "preciso"
        assert!((heuristic_confidence("Segue o arquivo anexo conforme combinado") - 0.77).abs() < 1e-6);
        // very short and no ask
        assert!((heuristic_confidence("oi") - 0.70).abs() < 1e-6);
        // bonus counted once
        assert!(
            (heuristic_confidence("obrigado, parabéns, preciso de algo?") - 0.90).abs() < 1e-6
        );
    }

    #[test]
    fn test_heuristic_confidence_bounds() {
        for email in ["", "?", "a b c d e f", "obrigado", "Preciso? Preciso! Problema?"] {
            let confidence = heuristic_confidence(email);
            assert!(
                (HEURISTIC_CONFIDENCE_RANGE.0..=HEURISTIC_CONFIDENCE_RANGE.1).contains(&confidence),
                "{} -> {}",
                email,
                confidence
            );
        }
    }
}
