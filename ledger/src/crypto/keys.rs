//! # Key Management
//!
//! Ed25519 keypairs for wallet identities and transaction signatures.
//!
//! The ledger core never inspects a signature — transactions are inert
//! payload from its point of view. Keys exist for the miners and wallets
//! at the boundary, which is exactly why this module stays small:
//! generate, sign, verify, encode. No key derivation trees, no mnemonics.
//!
//! Private key material is never logged and never serialized implicitly;
//! exporting secret bytes is a deliberate method call.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from key construction. Deliberately vague about *why* — error
/// messages that describe key material are a leak vector.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 signing identity: the thing a wallet is built around.
///
/// Does not implement `Serialize` — writing a private key somewhere should
/// be an explicit act (`secret_key_bytes`), not a side effect of shoving a
/// struct into JSON.
///
/// # Examples
///
/// ```
/// use strata_ledger::crypto::Keypair;
///
/// let kp = Keypair::generate();
/// let sig = kp.sign(b"mine block 2");
/// assert!(kp.public_key().verify(b"mine block 2", &sig));
/// ```
pub struct Keypair {
    signing_key: SigningKey,
}

/// The shareable half of a [`Keypair`]. Its hex form doubles as a wallet
/// address throughout the crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message. Always 64 bytes when produced by
/// [`Keypair::sign`]; anything else simply fails verification — no panics.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Keypair {
    /// Generate a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a keypair deterministically from a 32-byte seed. In
    /// Ed25519 the seed *is* the secret key. A weak seed makes a weak key;
    /// this is for tests and for keys recovered from proper KDFs.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded secret key, as read from
    /// a `--miner-key` flag or environment variable.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&arr))
    }

    /// The public half of this identity.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Hex-encoded public key. This is what Strata uses as an address.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign a message. Ed25519 is deterministic — same key, same message,
    /// same signature, no nonce management.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            bytes: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's own public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Export the raw 32-byte secret. Handle accordingly: don't log it,
    /// don't send it anywhere in plaintext.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret material stays out of debug output, fully, not "partially".
        write!(f, "Keypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for Keypair {
    /// Identity comparison goes through the public key; comparing secret
    /// bytes non-constant-time is a habit not worth forming.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Wrap raw bytes without curve validation. Prefer [`try_from_slice`]
    /// for bytes that arrived over a wire.
    ///
    /// [`try_from_slice`]: Self::try_from_slice
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Validate and wrap a byte slice. Rejects wrong lengths and byte
    /// strings that are not a point on the curve.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature. Boolean because every caller wants yes/no, not
    /// a taxonomy of the ways a forgery can be malformed.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }

    /// Hex encoding: 64 characters, same as a block hash, used as the
    /// wallet address form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    /// Wrap a raw 64-byte signature.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex encoding, 128 characters for a well-formed signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 16 {
            write!(f, "Signature({}...)", &hex_str[..16])
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}
