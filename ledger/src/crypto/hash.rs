//! # Hashing Utilities
//!
//! SHA-256 is the only hash function in Strata. Block linkage, transaction
//! payload digests, everything — one algorithm, one output length, and the
//! 64-character lowercase hex form is the canonical representation the
//! chain validates against.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input and return it as a 64-character
/// lowercase hex string.
///
/// This is the digest form the rest of the crate traffics in: block hashes
/// are strings, the genesis sentinel is a string, and `validate` checks
/// string length. Hex-encoding at the source keeps every caller honest
/// about that.
///
/// # Example
///
/// ```
/// use strata_ledger::crypto::sha256_hex;
///
/// let digest = sha256_hex(b"strata");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256_array(data))
}

/// Compute the SHA-256 hash and return the raw 32-byte digest.
///
/// For callers that want bytes rather than hex — signature payloads,
/// mostly. `sha256_hex` is this plus an encode.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices as if they were concatenated, without the
/// temporary buffer. Used for composite preimages like
/// `(index || timestamp || previous_hash || payload)`.
pub fn sha256_hex_multi(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
