//! Storage key derivation.
//!
//! Keys are pure functions of the content fingerprint, shaped for bucketed
//! remote object stores:
//!
//! ```text
//! key = "{hash[0..2]}/{hash[2..4]}/{hash}.{ext}"
//! ```
//!
//! The two two-character prefix segments spread files across a fan-out
//! directory layout so no single listing grows unbounded. No filesystem or
//! network side effects.

use crate::fingerprint::MINIMUM_HASH_LENGTH;

/// Derives a hierarchical storage key from a content hash and an optional
/// file extension.
///
/// The hash must be at least [`MINIMUM_HASH_LENGTH`] characters; every
/// supported [`HashAlgorithm`](crate::HashAlgorithm) guarantees this, so a
/// shorter hash is a caller precondition violation rather than a runtime
/// failure.
///
/// ```rust
/// use intake::storage_key;
///
/// assert_eq!(storage_key("deadbeef", Some("png")), "de/ad/deadbeef.png");
/// assert_eq!(storage_key("deadbeef", None), "de/ad/deadbeef");
/// ```
pub fn storage_key(hash: &str, extension: Option<&str>) -> String {
    debug_assert!(
        hash.len() >= MINIMUM_HASH_LENGTH,
        "hash too short to derive a key prefix"
    );
    let basename = match extension {
        Some(ext) => format!("{hash}.{ext}"),
        None => hash.to_string(),
    };
    format!("{}/{}/{}", &hash[..2], &hash[2..4], basename)
}
