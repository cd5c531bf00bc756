//! Lexical features reported alongside a triage result

use serde::{Deserialize, Serialize};

const URGENCY_WORDS: &[&str] = &["urgente", "imediato", "asap", "prioridade", "emergência"];
const GREETING_WORDS: &[&str] = &["olá", "oi", "bom dia", "boa tarde", "boa noite"];
const THANKS_WORDS: &[&str] = &["obrigado", "obrigada", "agradeço", "grato", "grata"];
const REQUEST_WORDS: &[&str] = &["solicito", "preciso", "gostaria", "poderia", "favor"];

/// Surface features of an email body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailFeatures {
    /// Length in characters
    pub length: usize,
    pub word_count: usize,
    pub has_question: bool,
    pub has_urgency: bool,
    pub has_greeting: bool,
    pub has_thanks: bool,
    pub has_request: bool,
}

impl EmailFeatures {
    pub fn extract(text: &str) -> Self {
        let lower = text.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|word| lower.contains(word));

        Self {
            length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            has_question: text.contains('?'),
            has_urgency: contains_any(URGENCY_WORDS),
            has_greeting: contains_any(GREETING_WORDS),
            has_thanks: contains_any(THANKS_WORDS),
            has_request: contains_any(REQUEST_WORDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_request_features() {
        let features = EmailFeatures::extract("Bom dia! Preciso de ajuda URGENTE com o acesso?");
        assert_eq!(features.word_count, 9);
        assert!(features.has_question);
        assert!(features.has_urgency);
        assert!(features.has_greeting);
        assert!(features.has_request);
        assert!(!features.has_thanks);
    }

    #[test]
    fn test_thanks_features() {
        let features = EmailFeatures::extract("Muito obrigada pela atenção.");
        assert_eq!(features.length, 28);
        assert!(features.has_thanks);
        assert!(!features.has_question);
        assert!(!features.has_request);
    }
}
