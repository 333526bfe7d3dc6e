//! Content sniffing: resolve a (extension, media type) pair from staged
//! bytes, never from caller-supplied labels.
//!
//! The probe runs in three steps:
//!
//! 1. Magic-number detection via `infer` against the staged path.
//! 2. For content `infer` cannot classify, a text probe: clean UTF-8 that
//!    parses as a JSON document is `application/json`; other clean UTF-8 is
//!    `text/plain`.
//! 3. Everything else is `bin` / `application/octet-stream`.
//!
//! Unknown content is a valid, representable outcome, not an error; only an
//! I/O failure while reading the staged file raises
//! [`IntakeError::GeneratingMimeTypeFailed`].
use std::fs;
use std::path::Path;

use crate::error::IntakeError;

/// Canonical lowercase extension and media type derived from staged bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SniffResult {
    pub extension: String,
    pub media_type: String,
}

impl SniffResult {
    fn new(extension: &str, media_type: &str) -> Self {
        Self {
            extension: extension.to_ascii_lowercase(),
            media_type: media_type.to_ascii_lowercase(),
        }
    }
}

/// Probes the file at `path` and resolves its canonical type pair.
pub(crate) fn sniff_path(path: &Path) -> Result<SniffResult, IntakeError> {
    let probe_failed = |err: std::io::Error| IntakeError::GeneratingMimeTypeFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };

    if let Some(matched) = infer::get_from_path(path).map_err(probe_failed)? {
        return Ok(SniffResult::new(matched.extension(), matched.mime_type()));
    }

    // Magic numbers drew a blank; fall back to the text probe over the full
    // staged contents.
    let bytes = fs::read(path).map_err(probe_failed)?;
    Ok(sniff_text(&bytes))
}

/// Classifies unmagiced bytes as JSON, plain text, or opaque binary.
fn sniff_text(bytes: &[u8]) -> SniffResult {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.is_empty() && is_clean_text(text) => {
            if is_json_document(text) {
                SniffResult::new("json", "application/json")
            } else {
                SniffResult::new("txt", "text/plain")
            }
        }
        _ => SniffResult::new("bin", "application/octet-stream"),
    }
}

/// True when the text carries no control characters beyond ordinary
/// whitespace.
fn is_clean_text(text: &str) -> bool {
    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
}

/// True for JSON object or array documents. Bare scalars stay `text/plain`;
/// a lone number or word is not usefully "a JSON file".
fn is_json_document(text: &str) -> bool {
    let trimmed = text.trim_start();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
}
