//! # Block Structure
//!
//! A block records its position in the chain (`index`), when it was built
//! (`timestamp_ms`), the hash of its predecessor (`previous_hash`), and an
//! ordered list of opaque transactions. Its own hash is *derived on every
//! read* from the current field values — there is no cached digest to go
//! stale. Mutate `index` and the very next `hash()` call reflects it.
//!
//! That property is load-bearing: the data fields are public precisely so
//! that tests can corrupt a block in place and watch `validate()` catch
//! it. `push` never re-checks linkage; discovery of corruption is entirely
//! `validate()`'s job.

use serde::{Deserialize, Serialize};

use crate::config::{GENESIS_INDEX, GENESIS_PREVIOUS_HASH, HASH_HEX_LENGTH};
use crate::crypto::hash::sha256_hex_multi;
use crate::error::LedgerError;
use crate::wallet::Transaction;

/// One block in the chain.
///
/// Constructed through [`Block::new`], which enforces argument shape
/// (positive index, 64-character previous hash) and nothing more —
/// whether the block actually *links* is decided later by
/// [`Blockchain::validate`](crate::chain::blockchain::Blockchain::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain. Genesis is 1; every successor is one more
    /// than its predecessor (checked by `validate`, not by construction).
    pub index: u64,
    /// Creation time in Unix milliseconds, fixed at construction.
    pub timestamp_ms: i64,
    /// Hash of the preceding block; sixty-four `'0'`s for genesis.
    pub previous_hash: String,
    /// Inert payload. The chain includes these bytes in the hash and
    /// otherwise never looks inside.
    pub transactions: Vec<Transaction>,
    /// Corruption hook: when set via [`set_hash`](Self::set_hash), this
    /// value is reported verbatim by [`hash`](Self::hash) instead of the
    /// derived digest. Not serialized; not part of the wire form.
    #[serde(skip)]
    hash_override: Option<String>,
}

impl Block {
    /// Build a block at `index` linking to `previous_hash`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidIndex`] when `index` is zero.
    /// - [`LedgerError::InvalidPreviousHash`] when `previous_hash` is not
    ///   exactly 64 characters.
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Result<Self, LedgerError> {
        let previous_hash = previous_hash.into();
        if index == 0 {
            return Err(LedgerError::InvalidIndex(index));
        }
        if previous_hash.len() != HASH_HEX_LENGTH {
            return Err(LedgerError::InvalidPreviousHash {
                expected: HASH_HEX_LENGTH,
                got: previous_hash.len(),
            });
        }
        Ok(Self {
            index,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            previous_hash,
            transactions,
            hash_override: None,
        })
    }

    /// The genesis block: index 1, all-zero previous hash, no payload.
    pub fn genesis() -> Self {
        Self {
            index: GENESIS_INDEX,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            transactions: Vec::new(),
            hash_override: None,
        }
    }

    /// Derive this block's hash from its *current* field values.
    ///
    /// A pure function of `index`, `timestamp_ms`, `previous_hash`, and
    /// the transaction payload — recomputed on every call, 64 lowercase
    /// hex characters. If the corruption hook is set, the override string
    /// is returned instead, whatever its length.
    pub fn hash(&self) -> String {
        if let Some(overridden) = &self.hash_override {
            return overridden.clone();
        }
        let payload = serde_json::to_vec(&self.transactions).unwrap_or_default();
        sha256_hex_multi(&[
            &self.index.to_le_bytes(),
            &self.timestamp_ms.to_le_bytes(),
            self.previous_hash.as_bytes(),
            &payload,
        ])
    }

    /// Pin the reported hash to an arbitrary string.
    ///
    /// This is the tamper hook the integrity tests rely on — set a
    /// wrong-length string here and the next `validate()` fails its
    /// hash-length check. Cleared by [`clear_hash`](Self::clear_hash).
    pub fn set_hash(&mut self, hash: impl Into<String>) {
        self.hash_override = Some(hash.into());
    }

    /// Drop the override and return to derived hashes.
    pub fn clear_hash(&mut self) {
        self.hash_override = None;
    }
}
