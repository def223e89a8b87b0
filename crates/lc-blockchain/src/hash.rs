//! Canonical SHA-256 digests of serializable records.
//!
//! Records are first converted to a [`serde_json::Value`].  Its object map is
//! ordered by key, so the encoded bytes depend only on the record's content
//! and never on field declaration or insertion order.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::BlockchainError;

/// Compact JSON encoding of `record` with object keys in sorted order.
pub fn canonical_bytes<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, BlockchainError> {
    let value = serde_json::to_value(record)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Hex-encoded SHA-256 of the canonical encoding of `record`.
pub fn digest<T: Serialize + ?Sized>(record: &T) -> Result<String, BlockchainError> {
    Ok(sha256_hex(&canonical_bytes(record)?))
}

/// Hex-encoded SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
