//! Deterministic hashing.
//!
//! Two flavors:
//!
//! - [`fingerprint`]: xxh64 over raw bytes, used on canonical byte keys such
//!   as [`SubGraph::short_label`](crate::SubGraph::short_label).
//! - [`canonical_hash`]: xxh64 over the JSON encoding of a serializable value.
//!   Struct fields serialize in declaration order and vectors in index order,
//!   so the hash is stable as long as the value holds no `HashMap`.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Hash raw bytes.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    xxh64(bytes, 0)
}

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}
