//! Cryptographic primitives for the ledger: SHA-256 digests for block
//! linkage and Ed25519 keys for transaction signatures.

pub mod hash;
pub mod keys;

pub use hash::{sha256_array, sha256_hex};
pub use keys::{Keypair, PublicKey, Signature};
