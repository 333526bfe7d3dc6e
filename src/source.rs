//! ByteSource resolution: classify an input string and yield raw bytes.
//!
//! Accepted shapes, tried in order:
//!
//! 1. RFC2397 `data:[<mediatype>][;base64],<data>` URIs. The first `:` and
//!    the first `,` delimit scheme, media-type segment, and payload.
//!    `;base64` payloads are decoded strictly; literal payloads are
//!    percent-decoded.
//! 2. Bare base64 payloads, only when
//!    [`assume_base64`](crate::IntakeConfig::assume_base64) is set. These
//!    are wrapped as `data:application/octet-stream;base64,<input>` and
//!    re-enter shape 1.
//! 3. Paths to existing local files. The file's bytes become the payload
//!    and its basename becomes the display name.
//!
//! This stage is read-only: no failure here touches the filesystem. The
//! declared media-type segment of a `data:` URI is stripped and discarded;
//! the sniffer alone decides the artifact's type.
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::config::IntakeConfig;
use crate::error::IntakeError;

/// Maximum accepted byte length for a path-shaped input.
#[cfg(unix)]
pub(crate) const MAX_PATH_LENGTH: usize = 4096;
#[cfg(not(unix))]
pub(crate) const MAX_PATH_LENGTH: usize = 260;

/// Where the resolved bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SourceOrigin {
    /// Inline payload (data URI or wrapped bare base64).
    Inline,
    /// An existing file on disk.
    LocalFile(PathBuf),
}

/// Resolved bytes plus the display name extracted from the input, if any.
///
/// Transient; exists only between resolution and staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawPayload {
    pub bytes: Vec<u8>,
    pub display_name: Option<String>,
    pub origin: SourceOrigin,
}

/// Classifies `raw` and resolves it to bytes, or fails with a typed error.
pub(crate) fn resolve(raw: &str, cfg: &IntakeConfig) -> Result<RawPayload, IntakeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::EmptyInput);
    }

    let wrapped;
    let input = if cfg.assume_base64 && !has_data_scheme(trimmed) {
        wrapped = format!("data:application/octet-stream;base64,{trimmed}");
        wrapped.as_str()
    } else {
        trimmed
    };

    if has_data_scheme(input) {
        return parse_data_uri(input);
    }

    resolve_path(trimmed)
}

fn has_data_scheme(input: &str) -> bool {
    input.len() >= 5 && input[..5].eq_ignore_ascii_case("data:")
}

/// Splits a `data:` URI on its first comma and decodes the payload segment.
fn parse_data_uri(input: &str) -> Result<RawPayload, IntakeError> {
    let body = &input[5..];
    let Some(comma) = body.find(',') else {
        return Err(IntakeError::InvalidRfc2397Encoding {
            snippet: snippet(input),
        });
    };
    let (header, payload) = (&body[..comma], &body[comma + 1..]);

    let bytes = if header.to_ascii_lowercase().ends_with(";base64") {
        BASE64
            .decode(payload)
            .map_err(|err| IntakeError::InvalidBase64Encoding {
                reason: err.to_string(),
            })?
    } else {
        // Literal payload: percent-decoded per the scheme, otherwise verbatim.
        percent_decode_str(payload).collect()
    };

    Ok(RawPayload {
        bytes,
        display_name: None,
        origin: SourceOrigin::Inline,
    })
}

/// Resolves a path-shaped input by reading the file's full contents.
fn resolve_path(input: &str) -> Result<RawPayload, IntakeError> {
    if input.len() > MAX_PATH_LENGTH {
        return Err(IntakeError::PathTooLong {
            length: input.len(),
            limit: MAX_PATH_LENGTH,
        });
    }

    let path = Path::new(input);
    if !path.exists() {
        // A bare token that names nothing on disk is indistinguishable from
        // garbage input; only path-looking strings report a path failure.
        if looks_like_path(input) {
            return Err(IntakeError::InvalidFilePath {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }
        return Err(IntakeError::InvalidDataProvided);
    }
    if path.is_dir() {
        return Err(IntakeError::InvalidFilePath {
            path: path.to_path_buf(),
            reason: "is a directory".into(),
        });
    }

    let bytes = fs::read(path).map_err(|err| IntakeError::InvalidFilePath {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    Ok(RawPayload {
        bytes,
        display_name,
        origin: SourceOrigin::LocalFile(path.to_path_buf()),
    })
}

fn looks_like_path(input: &str) -> bool {
    input.contains(std::path::MAIN_SEPARATOR) || input.starts_with('.') || input.starts_with('~')
}

fn snippet(input: &str) -> String {
    input.chars().take(48).collect()
}
