//! # Wallets and Value Objects
//!
//! The boundary collaborators around the chain: a [`Wallet`] holds an
//! Ed25519 identity and knows how to produce signed transactions, and
//! [`Money`]/[`Transaction`] are the value objects those transactions are
//! made of. None of this is consulted during chain validation.

pub mod money;
pub mod transaction;

pub use money::{Currency, Money};
pub use transaction::Transaction;

use crate::config::MINING_REWARD;
use crate::crypto::keys::{Keypair, PublicKey};

/// An identity that can receive rewards and sign transactions.
///
/// The address is the hex form of the public key — 64 characters, same
/// alphabet as a block hash, easy to eyeball in logs.
#[derive(Debug, Clone)]
pub struct Wallet {
    keypair: Keypair,
    address: String,
}

impl Wallet {
    /// Wrap an existing keypair.
    pub fn new(keypair: Keypair) -> Self {
        let address = keypair.address();
        Self { keypair, address }
    }

    /// Generate a wallet with a fresh keypair.
    pub fn generate() -> Self {
        Self::new(Keypair::generate())
    }

    /// The wallet's address (hex public key).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The public half of the wallet's identity.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Sign a transaction with this wallet's key.
    pub fn sign(&self, tx: &mut Transaction) {
        tx.sign(&self.keypair);
    }

    /// Build the signed reward transaction a miner attaches when mining a
    /// block: no sender, this wallet as recipient, the configured reward.
    pub fn reward_transaction(&self) -> Transaction {
        let mut tx = Transaction::new(
            None,
            self.address.clone(),
            Money::new(MINING_REWARD, Currency::BTC),
        );
        tx.sign(&self.keypair);
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_matches_public_key_hex() {
        let wallet = Wallet::generate();
        assert_eq!(wallet.address(), wallet.public_key().to_hex());
    }

    #[test]
    fn reward_transaction_is_signed_and_addressed_to_self() {
        let wallet = Wallet::generate();
        let tx = wallet.reward_transaction();
        assert!(tx.is_reward());
        assert_eq!(tx.recipient, wallet.address());
        assert_eq!(tx.funds.amount, MINING_REWARD);
        assert!(tx.verify(&wallet.public_key()));
    }

    #[test]
    fn sign_applies_this_wallets_key() {
        let wallet = Wallet::generate();
        let mut tx = Transaction::new(
            Some(wallet.address().to_string()),
            "someone-else",
            Money::new(5, Currency::USD),
        );
        wallet.sign(&mut tx);
        assert!(tx.verify(&wallet.public_key()));
    }
}
