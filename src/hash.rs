//! Content fingerprinting for change detection
//!
//! Fingerprints are only ever compared for equality; the digest algorithm
//! carries no other semantics.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::PipewrightResult;

/// Content-based digest of a file, formatted as `sha256:<hex>`
pub type Fingerprint = String;

/// Compute the fingerprint of a file's current bytes
///
/// Returns `None` when the file does not exist - a missing file is the
/// regular pre-publish state, not an error.
pub fn fingerprint(path: &Path) -> PipewrightResult<Option<Fingerprint>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(fingerprint_bytes(&bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Fingerprint in-memory content
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}
