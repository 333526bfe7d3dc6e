//! Content Intake
//!
//! This is where content of unknown origin enters the system. We take an
//! RFC2397 `data:` URI, a bare base64 payload, or a path to a local file,
//! and normalize it into one disk-backed artifact with a verified content
//! type, a content fingerprint, a storage key, and deterministic cleanup.
//!
//! ## What we do here
//!
//! - **Resolve** - Classify the input shape and decode it to raw bytes.
//!   Declared media types are stripped, never trusted.
//! - **Stage** - Write the bytes durably to a uniquely named file in the
//!   staging directory, or copy a source file into it.
//! - **Sniff** - Determine the true type from the staged bytes (magic
//!   numbers first, text probe second) and rename the file to carry the
//!   resolved extension. Unknown content is `bin`, not an error.
//! - **Fingerprint** - Hash the final staged bytes with a caller-selected
//!   algorithm and record the byte size.
//! - **Key** - Derive a bucketed storage key from the fingerprint.
//! - **Log everything** - Structured logs via tracing for debugging
//!   production issues.
//!
//! Stages run strictly in that order; any failure after staging removes the
//! staged file before the error surfaces, so no invocation leaks temp
//! files. Errors before staging never touch the filesystem.
//!
//! ## Main entry point
//!
//! Call [`ingest`] with an input string and an [`IntakeConfig`], get back a
//! [`StagedArtifact`]. Errors are typed so you can actually handle them.
//!
//! ## Example
//!
//! ```
//! use intake::{ingest, IntakeConfig};
//!
//! let config = IntakeConfig::default();
//! let artifact = ingest("data:text/plain;base64,SGVsbG8sIHdvcmxkIQ==", &config).unwrap();
//!
//! assert_eq!(artifact.size(), 13);
//! assert_eq!(artifact.media_type(), "text/plain");
//! assert_eq!(artifact.read().unwrap(), b"Hello, world!");
//! // The staged file is deleted when `artifact` goes out of scope.
//! ```
use std::time::Instant;

use tracing::{info, warn, Level};

mod artifact;
mod config;
mod error;
mod filetype;
mod fingerprint;
mod key;
mod sniff;
mod source;
mod staging;

pub use crate::artifact::StagedArtifact;
pub use crate::config::{ConfigError, HashAlgorithm, IntakeConfig};
pub use crate::error::{ErrorKind, IntakeError};
pub use crate::filetype::{classify, FileKind};
pub use crate::fingerprint::{fingerprint_bytes, MINIMUM_HASH_LENGTH};
pub use crate::key::storage_key;

use crate::source::SourceOrigin;

/// Ingest one input: resolves it to bytes, stages them, sniffs the true
/// content type, fingerprints the staged file, and returns the owning
/// descriptor.
pub fn ingest(raw: &str, cfg: &IntakeConfig) -> Result<StagedArtifact, IntakeError> {
    let start = Instant::now();

    if let Err(err) = cfg.validate() {
        let elapsed_micros = start.elapsed().as_micros();
        warn!(error = %err, elapsed_micros, "ingest_failure");
        return Err(IntakeError::InvalidConfiguration {
            reason: err.to_string(),
        });
    }

    let span = tracing::span!(
        Level::INFO,
        "intake.ingest",
        algorithm = %cfg.hash_algorithm,
        assume_base64 = cfg.assume_base64
    );
    let _guard = span.enter();

    match ingest_inner(raw, cfg) {
        Ok(artifact) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                hash = %artifact.hash(),
                media_type = %artifact.media_type(),
                size = artifact.size(),
                key = %artifact.key(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(artifact)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

/// Core pipeline: resolve, stage, sniff, fingerprint, key, hand off.
///
/// The [`staging::StagedFile`] guard owns the staged path until the final
/// hand-off, so an early return from any later stage removes the file.
fn ingest_inner(raw: &str, cfg: &IntakeConfig) -> Result<StagedArtifact, IntakeError> {
    let payload = source::resolve(raw, cfg)?;
    let mut staged = staging::stage(&payload, cfg)?;

    let sniffed = sniff::sniff_path(staged.path())?;
    staged.carry_extension(&sniffed.extension)?;

    let hash = fingerprint::fingerprint_file(staged.path(), cfg.hash_algorithm)?;
    let size = fingerprint::file_size(staged.path())?;
    let key = key::storage_key(&hash, Some(&sniffed.extension));

    let name = cfg
        .display_name
        .clone()
        .or_else(|| payload.display_name.clone())
        .unwrap_or_else(|| staged.basename());
    let kind = filetype::classify(&sniffed.extension);

    // The original is removed only once the whole pipeline has succeeded;
    // best-effort, the artifact is already complete.
    if cfg.delete_original {
        if let SourceOrigin::LocalFile(src) = &payload.origin {
            if let Err(err) = std::fs::remove_file(src) {
                warn!(path = %src.display(), error = %err, "delete_original_failed");
            }
        }
    }

    let path = staged.release();
    StagedArtifact::from_parts(
        hash,
        path,
        name,
        kind,
        sniffed.media_type,
        sniffed.extension,
        size,
        key,
        cfg.auto_delete_staged,
    )
}
