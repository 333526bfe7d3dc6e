//! Content fingerprinting and sizing of staged files.
//!
//! Digests are computed over the staged file's exact bytes (post-decode,
//! post-stage) and rendered as lowercase hex. The algorithm is selected by
//! the caller via [`HashAlgorithm`]; unknown names are rejected at pipeline
//! entry, never mid-pipeline.
//!
//! # Digest widths
//!
//! | Algorithm | Hex length |
//! |-----------|------------|
//! | sha256    | 64 |
//! | sha512    | 128 |
//! | blake3    | 64 |
//!
//! All widths are far above [`MINIMUM_HASH_LENGTH`], the four characters
//! needed to slice a two-level storage key prefix.
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256, Sha512};

use crate::config::HashAlgorithm;
use crate::error::IntakeError;

/// Minimum fingerprint length required to derive a storage key prefix.
///
/// Guaranteed by every supported algorithm; enforced explicitly only when a
/// descriptor is constructed manually from parts.
pub const MINIMUM_HASH_LENGTH: usize = 4;

/// Hashes the file at `path` with the selected algorithm, returning a
/// lowercase hex digest.
pub fn fingerprint_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, IntakeError> {
    let bytes = fs::read(path).map_err(|err| IntakeError::GeneratingHashFailed {
        path: path.to_path_buf(),
        algorithm: algorithm.name().to_string(),
        reason: err.to_string(),
    })?;
    Ok(fingerprint_bytes(&bytes, algorithm))
}

/// Hashes a byte slice with the selected algorithm, returning a lowercase
/// hex digest.
pub fn fingerprint_bytes(bytes: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
        HashAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
    }
}

/// Byte length of the file at `path`.
pub fn file_size(path: &Path) -> Result<u64, IntakeError> {
    let meta = fs::metadata(path).map_err(|err| IntakeError::CalculatingFileSizeFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(meta.len())
}
