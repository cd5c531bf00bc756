//! Email text normalization ahead of classification

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a word character, whitespace or `. , ! ? -`
static DISALLOWED_CHARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[^\w\s\.,!\?\-]").ok());

static WHITESPACE_RUNS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+").ok());

/// Normalize raw email text for the classifier.
///
/// Replaces disallowed characters with a space, collapses whitespace runs
/// (newlines included) to one space, lower-cases and trims. Never fails: if
/// the patterns are unavailable the input is returned untouched.
/// `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let (Some(disallowed), Some(whitespace)) = (DISALLOWED_CHARS.as_ref(), WHITESPACE_RUNS.as_ref())
    else {
        tracing::error!("Normalization patterns unavailable, using raw text");
        return text.to_string();
    };

    let cleaned = disallowed.replace_all(text, " ");
    let collapsed = whitespace.replace_all(&cleaned, " ");
    collapsed.to_lowercase().trim().to_string()
}
