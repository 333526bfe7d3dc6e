//! Error types produced by the intake pipeline.
//!
//! All errors are typed, cloneable, and comparable so callers can branch on
//! exact failure causes and tests can assert on them precisely. Each variant
//! carries the context needed to diagnose the failure (offending path,
//! algorithm name) rather than a bare message.
//!
//! # Error Categories
//!
//! | Kind | Variants | When |
//! |------|----------|------|
//! | [`ErrorKind::InvalidInput`] | `EmptyInput`, `InvalidRfc2397Encoding`, `InvalidBase64Encoding`, `PathTooLong`, `InvalidFilePath`, `InvalidDataProvided`, `FingerprintTooShort` | The caller's input string is unusable |
//! | [`ErrorKind::Configuration`] | `TempDirectoryNotWritable`, `UnsupportedHashAlgorithm`, `InvalidConfiguration` | Detected before any filesystem side effect |
//! | [`ErrorKind::Staging`] | `TemporaryFileNotWritten`, `WritingTemporaryFileFailed`, `RenamingTemporaryFileFailed` | Temp file creation/write/rename failed |
//! | [`ErrorKind::Inspection`] | `GeneratingMimeTypeFailed`, `GeneratingHashFailed`, `CalculatingFileSizeFailed` | I/O failure while probing staged content |
//! | [`ErrorKind::Read`] | `ReadingFileFailed` | A constructed artifact's file vanished |
//!
//! Any failure raised after a file has been staged removes that file before
//! the error surfaces; errors before staging never touch the filesystem.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving, staging, or inspecting content.
///
/// The enum is marked `#[non_exhaustive]` to allow future additions without
/// breaking existing code. Callers should include a catch-all arm when
/// matching, or branch on [`IntakeError::kind`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntakeError {
    /// Input string was empty after trimming surrounding whitespace.
    #[error("input is empty")]
    EmptyInput,

    /// Input carried the `data:` scheme but no comma separator, so the
    /// payload cannot be located per RFC2397.
    #[error("malformed data: URI (missing comma separator): {snippet:?}")]
    InvalidRfc2397Encoding {
        /// Leading slice of the offending input, for diagnostics.
        snippet: String,
    },

    /// A `;base64` payload failed strict decoding (non-alphabet character
    /// or bad padding).
    #[error("invalid base64 payload: {reason}")]
    InvalidBase64Encoding { reason: String },

    /// A path-shaped input exceeds the platform's maximum path length.
    #[error("path length {length} exceeds platform limit of {limit} bytes")]
    PathTooLong { length: usize, limit: usize },

    /// A path-shaped input does not point at a readable regular file.
    #[error("invalid file path {path:?}: {reason}")]
    InvalidFilePath { path: PathBuf, reason: String },

    /// Input matched neither a `data:` URI nor an existing file path.
    #[error("input is neither a data: URI nor a readable file path")]
    InvalidDataProvided,

    /// A manually supplied fingerprint is too short to derive a storage key.
    #[error("fingerprint length {length} is below the minimum of {minimum}")]
    FingerprintTooShort { length: usize, minimum: usize },

    /// The staging directory is missing, not a directory, or not writable.
    /// Raised before any file is created.
    #[error("temporary directory {dir:?} is missing or not writable")]
    TempDirectoryNotWritable { dir: PathBuf },

    /// The requested hash algorithm name is not supported.
    /// Raised before any input byte is read.
    #[error("unsupported hash algorithm {name:?}")]
    UnsupportedHashAlgorithm { name: String },

    /// The supplied [`IntakeConfig`](crate::IntakeConfig) failed validation
    /// at pipeline entry.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Exclusive creation of the staging file failed, even after one retry
    /// with a fresh random suffix.
    #[error("could not create temporary file in {dir:?}: {reason}")]
    TemporaryFileNotWritten { dir: PathBuf, reason: String },

    /// Writing or copying resolved bytes into the staging file failed.
    /// The partially written file has already been removed.
    #[error("writing temporary file {path:?} failed: {reason}")]
    WritingTemporaryFileFailed { path: PathBuf, reason: String },

    /// The media-type probe could not read the staged file. Distinct from
    /// "unknown type", which is a success outcome.
    #[error("probing media type of {path:?} failed: {reason}")]
    GeneratingMimeTypeFailed { path: PathBuf, reason: String },

    /// Renaming the staged file to carry its sniffed extension failed.
    /// The pre-rename staged file has already been removed.
    #[error("renaming temporary file {from:?} to {to:?} failed: {reason}")]
    RenamingTemporaryFileFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Hashing the staged file failed due to an I/O error.
    /// The staged file has already been removed.
    #[error("hashing {path:?} with {algorithm} failed: {reason}")]
    GeneratingHashFailed {
        path: PathBuf,
        algorithm: String,
        reason: String,
    },

    /// Reading the staged file's byte length failed.
    /// The staged file has already been removed.
    #[error("reading size of {path:?} failed: {reason}")]
    CalculatingFileSizeFailed { path: PathBuf, reason: String },

    /// A post-construction read of an artifact's file failed, typically
    /// because the file was externally deleted.
    #[error("reading staged file {path:?} failed: {reason}")]
    ReadingFileFailed { path: PathBuf, reason: String },
}

/// Coarse grouping of [`IntakeError`] variants.
///
/// Useful for mapping failures onto HTTP status families or retry policies
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's input string is unusable.
    InvalidInput,
    /// Misconfiguration detected before any filesystem side effect.
    Configuration,
    /// Temp file creation, write, or rename failed.
    Staging,
    /// Probing staged content (media type, hash, size) failed due to I/O.
    Inspection,
    /// A constructed artifact's file could not be read back.
    Read,
}

impl IntakeError {
    /// Returns the coarse category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IntakeError::EmptyInput
            | IntakeError::InvalidRfc2397Encoding { .. }
            | IntakeError::InvalidBase64Encoding { .. }
            | IntakeError::PathTooLong { .. }
            | IntakeError::InvalidFilePath { .. }
            | IntakeError::InvalidDataProvided
            | IntakeError::FingerprintTooShort { .. } => ErrorKind::InvalidInput,
            IntakeError::TempDirectoryNotWritable { .. }
            | IntakeError::UnsupportedHashAlgorithm { .. }
            | IntakeError::InvalidConfiguration { .. } => ErrorKind::Configuration,
            IntakeError::TemporaryFileNotWritten { .. }
            | IntakeError::WritingTemporaryFileFailed { .. }
            | IntakeError::RenamingTemporaryFileFailed { .. } => ErrorKind::Staging,
            IntakeError::GeneratingMimeTypeFailed { .. }
            | IntakeError::GeneratingHashFailed { .. }
            | IntakeError::CalculatingFileSizeFailed { .. } => ErrorKind::Inspection,
            IntakeError::ReadingFileFailed { .. } => ErrorKind::Read,
        }
    }

    /// Returns true if this error indicates bad caller input rather than an
    /// environment or I/O problem.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidInput)
    }
}
