//! Ed25519 signing for challenge authentication.

use std::fmt;

use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use rand_core::OsRng;
use thiserror::Error;

/// Errors from keypair construction.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid hex seed: {0}")]
    InvalidHex(String),

    #[error("seed must be exactly 32 bytes")]
    InvalidSeedLength,
}

/// Signing capability consumed by the session manager.
///
/// Kept minimal on purpose: a stable public identifier and raw message
/// signing. Implementations may hold keys in memory ([`Keypair`]) or
/// delegate to external key storage.
pub trait Signer: Send + Sync {
    /// Stable public identifier for this identity.
    fn address(&self) -> String;

    /// Sign a raw message, returning the signature bytes.
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// In-memory Ed25519 keypair.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create from raw seed bytes.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create from a hex-encoded seed, with or without a `0x` prefix.
    pub fn from_hex(hex_seed: &str) -> Result<Self, KeyError> {
        let hex_seed = hex_seed.strip_prefix("0x").unwrap_or(hex_seed);
        let bytes = hex::decode(hex_seed).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidSeedLength)?;
        Ok(Self::from_seed(&seed))
    }
}

impl Signer for Keypair {
    fn address(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

// Never print the private key.
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish()
    }
}
