//! Transaction value objects.
//!
//! From the chain's perspective a transaction is inert payload — it is
//! serialized into the block hash and never inspected. The structure here
//! exists for the boundary that *creates* transactions: the mining service
//! building a signed reward, and anything that later wants to check the
//! signature.

use serde::{Deserialize, Serialize};

use crate::crypto::keys::{Keypair, PublicKey, Signature};
use crate::wallet::money::Money;

/// A transfer of funds between two addresses, or a reward out of thin air
/// when `sender` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id (UUID v4).
    pub id: String,
    /// Hex address of the sender; `None` marks a mining reward.
    pub sender: Option<String>,
    /// Hex address of the recipient.
    pub recipient: String,
    /// The funds being moved.
    pub funds: Money,
    /// Creation time in Unix milliseconds.
    pub timestamp_ms: i64,
    /// Ed25519 signature over [`signing_payload`](Self::signing_payload),
    /// absent until [`sign`](Self::sign) is called.
    pub signature: Option<Signature>,
}

impl Transaction {
    /// Build an unsigned transaction.
    pub fn new(sender: Option<String>, recipient: impl Into<String>, funds: Money) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            recipient: recipient.into(),
            funds,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            signature: None,
        }
    }

    /// `true` for reward transactions (no sender).
    pub fn is_reward(&self) -> bool {
        self.sender.is_none()
    }

    /// The canonical bytes a signature covers: every field except the
    /// signature itself, as JSON. Deterministic for a given transaction.
    pub fn signing_payload(&self) -> Vec<u8> {
        let view = serde_json::json!({
            "id": self.id,
            "sender": self.sender,
            "recipient": self.recipient,
            "funds": self.funds,
            "timestamp_ms": self.timestamp_ms,
        });
        view.to_string().into_bytes()
    }

    /// Sign in place with the given keypair.
    pub fn sign(&mut self, keypair: &Keypair) {
        self.signature = Some(keypair.sign(&self.signing_payload()));
    }

    /// Verify the signature against a public key. Unsigned transactions
    /// never verify.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        match &self.signature {
            Some(signature) => public_key.verify(&self.signing_payload(), signature),
            None => false,
        }
    }
}
