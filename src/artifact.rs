//! The staged artifact: an immutable, self-describing descriptor that owns
//! its staged file's lifecycle.
//!
//! A [`StagedArtifact`] is constructed only by a fully successful pipeline
//! run (or explicitly via [`StagedArtifact::from_parts`]). It is the single
//! owner of the file at its path: the file is deleted exactly once, either
//! by an explicit [`dispose`](StagedArtifact::dispose) call or implicitly
//! on drop when `auto_delete` is set. Both paths are existence-checked, so
//! double deletion is a no-op rather than an error.
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

use crate::error::IntakeError;
use crate::filetype::FileKind;
use crate::fingerprint::MINIMUM_HASH_LENGTH;

/// Immutable descriptor for one ingested piece of content.
///
/// Aggregates the content fingerprint, the staged file's absolute path, a
/// display name, the sniffed type pair, the byte size, and the derived
/// storage key.
///
/// Two artifacts with equal hash but different paths are "the same content,
/// different copies" — loosely equal, strictly unequal.
#[derive(Debug, Serialize)]
pub struct StagedArtifact {
    hash: String,
    path: PathBuf,
    name: String,
    kind: FileKind,
    media_type: String,
    extension: String,
    size: u64,
    key: String,
    auto_delete: bool,
    #[serde(skip)]
    disposed: bool,
}

impl StagedArtifact {
    /// Assembles an artifact from already-validated parts.
    ///
    /// The pipeline guarantees the fingerprint invariant by algorithm
    /// choice; manual callers must satisfy it here: `hash` must be at least
    /// [`MINIMUM_HASH_LENGTH`] characters, or the storage-key prefix could
    /// not have been derived.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        hash: String,
        path: PathBuf,
        name: String,
        kind: FileKind,
        media_type: String,
        extension: String,
        size: u64,
        key: String,
        auto_delete: bool,
    ) -> Result<Self, IntakeError> {
        if hash.len() < MINIMUM_HASH_LENGTH {
            return Err(IntakeError::FingerprintTooShort {
                length: hash.len(),
                minimum: MINIMUM_HASH_LENGTH,
            });
        }
        Ok(Self {
            hash,
            path,
            name,
            kind,
            media_type,
            extension,
            size,
            key,
            auto_delete,
            disposed: false,
        })
    }

    /// Lowercase hex content fingerprint.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Absolute path of the staged, renamed file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name: caller-provided override, source basename, or the
    /// staged basename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical type tag for routing decisions.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Sniffed lowercase media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Sniffed lowercase extension token, e.g. `png`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Byte length of the staged file at construction time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hierarchical storage key derived from the fingerprint.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether drop deletes the staged file.
    pub fn auto_delete(&self) -> bool {
        self.auto_delete
    }

    /// Compares two artifacts.
    ///
    /// Loose equality (`strict = false`) compares only the content hash;
    /// strict equality additionally requires the same path.
    pub fn equals(&self, other: &StagedArtifact, strict: bool) -> bool {
        self.hash == other.hash && (!strict || self.path == other.path)
    }

    /// Re-reads the full byte contents of the staged file.
    ///
    /// Fails if the file has been externally deleted or is unreadable at
    /// call time.
    pub fn read(&self) -> Result<Vec<u8>, IntakeError> {
        fs::read(&self.path).map_err(|err| IntakeError::ReadingFileFailed {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    /// Re-encodes the staged file as an RFC2397 base64 data URI,
    /// `data:{media_type};base64,{payload}`.
    pub fn to_data_uri(&self) -> Result<String, IntakeError> {
        let bytes = self.read()?;
        Ok(format!(
            "data:{};base64,{}",
            self.media_type,
            BASE64.encode(bytes)
        ))
    }

    /// Deletes the staged file now, regardless of the `auto_delete` flag.
    ///
    /// Idempotent: existence-checked, safe to call more than once, and safe
    /// to combine with the implicit drop cleanup.
    pub fn dispose(&mut self) {
        self.disposed = true;
        remove_if_present(&self.path);
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        // Best-effort: no caller is left to react to failures here.
        if self.auto_delete && !self.disposed {
            remove_if_present(&self.path);
        }
    }
}

fn remove_if_present(path: &Path) {
    if path.exists() {
        if let Err(err) = fs::remove_file(path) {
            debug!(path = %path.display(), error = %err, "staged_cleanup_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filetype;

    fn artifact_at(path: PathBuf, hash: &str, auto_delete: bool) -> StagedArtifact {
        StagedArtifact::from_parts(
            hash.into(),
            path,
            "fixture.txt".into(),
            filetype::classify("txt"),
            "text/plain".into(),
            "txt".into(),
            4,
            crate::storage_key(hash, Some("txt")),
            auto_delete,
        )
        .expect("valid parts")
    }

    fn staged_fixture(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"Test").expect("write fixture");
        path
    }

    #[test]
    fn short_fingerprint_rejected() {
        let err = StagedArtifact::from_parts(
            "abc".into(),
            "/tmp/x.txt".into(),
            "x".into(),
            FileKind::Text,
            "text/plain".into(),
            "txt".into(),
            0,
            "ab/c".into(),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::FingerprintTooShort { length: 3, minimum: 4 }
        ));
    }

    #[test]
    fn loose_and_strict_equality() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = artifact_at(staged_fixture(dir.path(), "a.txt"), "cafebabe", false);
        let b = artifact_at(staged_fixture(dir.path(), "b.txt"), "cafebabe", false);
        let c = artifact_at(staged_fixture(dir.path(), "c.txt"), "deadbeef", false);

        assert!(a.equals(&b, false));
        assert!(!a.equals(&b, true));
        assert!(a.equals(&a, true));
        assert!(!a.equals(&c, false));
    }

    #[test]
    fn read_returns_exact_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifact = artifact_at(staged_fixture(dir.path(), "r.txt"), "cafebabe", false);
        assert_eq!(artifact.read().unwrap(), b"Test");
    }

    #[test]
    fn read_after_external_deletion_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifact = artifact_at(staged_fixture(dir.path(), "gone.txt"), "cafebabe", false);
        fs::remove_file(artifact.path()).unwrap();
        assert!(matches!(
            artifact.read().unwrap_err(),
            IntakeError::ReadingFileFailed { .. }
        ));
    }

    #[test]
    fn to_data_uri_reencodes_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifact = artifact_at(staged_fixture(dir.path(), "enc.txt"), "cafebabe", false);
        assert_eq!(
            artifact.to_data_uri().unwrap(),
            "data:text/plain;base64,VGVzdA=="
        );
    }

    #[test]
    fn auto_delete_removes_file_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = staged_fixture(dir.path(), "drop.txt");
        let artifact = artifact_at(path.clone(), "cafebabe", true);
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn without_auto_delete_drop_keeps_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = staged_fixture(dir.path(), "keep.txt");
        let artifact = artifact_at(path.clone(), "cafebabe", false);
        drop(artifact);
        assert!(path.exists());
    }

    #[test]
    fn dispose_is_idempotent_with_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = staged_fixture(dir.path(), "twice.txt");
        let mut artifact = artifact_at(path.clone(), "cafebabe", true);
        artifact.dispose();
        assert!(!path.exists());
        artifact.dispose(); // second explicit call is a no-op
        drop(artifact); // and so is the implicit cleanup
        assert!(!path.exists());
    }

    #[test]
    fn externally_deleted_file_does_not_panic_cleanup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = staged_fixture(dir.path(), "ext.txt");
        let artifact = artifact_at(path.clone(), "cafebabe", true);
        fs::remove_file(&path).unwrap();
        drop(artifact); // existence-checked, must not error
    }

    #[test]
    fn serializes_without_lifecycle_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifact = artifact_at(staged_fixture(dir.path(), "ser.txt"), "cafebabe", false);
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["hash"], "cafebabe");
        assert_eq!(json["key"], "ca/fe/cafebabe.txt");
        assert!(json.get("disposed").is_none());
    }
}
