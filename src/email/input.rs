//! Validated email input and plain-text file loading

use crate::ai::error::{TriageError, TriageResult};
use std::path::Path;

/// Email text that is known to contain something besides whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailText(String);

impl EmailText {
    /// Reject empty and whitespace-only input before it reaches the classifier
    pub fn parse(text: impl Into<String>) -> TriageResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TriageError::EmptyInput);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Accept only non-empty `.txt` file names
fn check_text_filename(filename: &str) -> TriageResult<()> {
    if filename.trim().is_empty() {
        return Err(TriageError::invalid_input("Nenhum arquivo selecionado"));
    }

    let is_text = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    if !is_text {
        return Err(TriageError::unsupported_format(filename.to_lowercase()));
    }
    Ok(())
}

/// Decode an uploaded file into email text.
///
/// Only `.txt` is accepted; anything else, PDF included, is an unsupported
/// format.
pub fn decode_upload(filename: &str, bytes: Vec<u8>) -> TriageResult<String> {
    check_text_filename(filename)?;

    String::from_utf8(bytes).map_err(|e| {
        tracing::debug!("Upload {} is not valid UTF-8: {}", filename, e);
        TriageError::invalid_input("arquivo de texto não está em UTF-8")
    })
}

/// Read an email from a file on disk; the name is checked before any read
pub async fn load_email_file(path: &Path) -> TriageResult<String> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    check_text_filename(&filename)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        TriageError::invalid_input(format!("não foi possível ler {}: {}", path.display(), e))
    })?;

    decode_upload(&filename, bytes)
}
