//! Configuration types for the intake pipeline.
//!
//! [`IntakeConfig`] controls how an input string is interpreted, where
//! resolved bytes are staged, and what happens to staged files when the
//! resulting artifact goes out of scope. It is cheap to clone and easy to
//! deserialize from external configuration formats such as JSON, TOML, or
//! YAML.
//!
//! # Quick Start
//!
//! ```rust
//! use intake::IntakeConfig;
//!
//! let config = IntakeConfig::default();
//! config.validate().expect("invalid configuration");
//! ```
//!
//! # Custom Configuration
//!
//! ```rust
//! use intake::{HashAlgorithm, IntakeConfig};
//!
//! let config = IntakeConfig {
//!     temp_dir: Some("/var/spool/intake".into()),
//!     hash_algorithm: HashAlgorithm::Blake3,
//!     assume_base64: true,
//!     delete_original: false,
//!     auto_delete_staged: true,
//!     display_name: None,
//! };
//! assert!(config.validate().is_ok());
//! ```
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::IntakeError;

/// Content hash algorithms supported by the fingerprinting stage.
///
/// All algorithms produce lowercase hex digests well above the four
/// characters needed to derive a two-level storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, 64 hex characters. The default.
    #[default]
    Sha256,
    /// SHA-512, 128 hex characters.
    Sha512,
    /// BLAKE3, 64 hex characters.
    Blake3,
}

impl HashAlgorithm {
    /// Resolves an algorithm from its lowercase name.
    ///
    /// Unknown names are rejected with
    /// [`IntakeError::UnsupportedHashAlgorithm`] before any input byte is
    /// read, so misconfiguration surfaces at pipeline entry rather than
    /// mid-flight.
    ///
    /// ```rust
    /// use intake::HashAlgorithm;
    ///
    /// assert_eq!(HashAlgorithm::from_name("sha256").unwrap(), HashAlgorithm::Sha256);
    /// assert!(HashAlgorithm::from_name("not-a-real-algo").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self, IntakeError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(IntakeError::UnsupportedHashAlgorithm { name: name.into() }),
        }
    }

    /// Canonical lowercase name of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime configuration for a single intake invocation.
///
/// Validated once at pipeline entry; the pipeline itself never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Directory where resolved bytes are staged.
    ///
    /// Must exist and be writable. When `None`, the platform temp directory
    /// (`std::env::temp_dir()`) is used.
    ///
    /// Default: `None`
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Hash algorithm used to fingerprint staged content.
    ///
    /// Default: [`HashAlgorithm::Sha256`]
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Treat inputs without a `data:` prefix as bare base64 payloads.
    ///
    /// When set, such inputs are wrapped as
    /// `data:application/octet-stream;base64,<input>` before resolution.
    ///
    /// Default: `false`
    #[serde(default)]
    pub assume_base64: bool,

    /// Remove the source file after a path-shaped input has been fully
    /// ingested.
    ///
    /// Removal happens only once the entire pipeline has succeeded, so a
    /// failed downstream stage never destroys the caller's original.
    ///
    /// Default: `false`
    #[serde(default)]
    pub delete_original: bool,

    /// Delete the staged file when the resulting [`StagedArtifact`] is
    /// dropped.
    ///
    /// Explicit disposal via [`StagedArtifact::dispose`] is honored
    /// regardless of this flag.
    ///
    /// [`StagedArtifact`]: crate::StagedArtifact
    /// [`StagedArtifact::dispose`]: crate::StagedArtifact::dispose
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub auto_delete_staged: bool,

    /// Display name override for the resulting artifact.
    ///
    /// When `None`, the name is derived from the source path's basename, or
    /// from the staged basename for inline payloads.
    ///
    /// Default: `None`
    #[serde(default)]
    pub display_name: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            hash_algorithm: HashAlgorithm::default(),
            assume_base64: false,
            delete_original: false,
            auto_delete_staged: true,
            display_name: None,
        }
    }
}

impl IntakeConfig {
    /// Validates internal consistency of this configuration.
    ///
    /// Inexpensive, in-memory only; intended to be called at start-up and
    /// invoked again by [`ingest`](crate::ingest) at pipeline entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyDisplayName);
            }
        }
        Ok(())
    }

    /// The directory staged files are written to: the configured override,
    /// or the platform temp directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Errors that can occur when validating an [`IntakeConfig`].
///
/// These are configuration-time issues, intended to surface during service
/// start-up rather than at request time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A display-name override was provided but is empty or whitespace-only.
    #[error("display_name override is empty")]
    EmptyDisplayName,
}
