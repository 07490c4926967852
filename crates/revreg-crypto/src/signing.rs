use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CryptoError;
use crate::keys::{Ed25519KeyPair, KeyPair, PublicKey, Secp256k1KeyPair};

/// Signature scheme tag carried next to every proof signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// Ed25519 over the raw message.
    Ed25519,
    /// ECDSA secp256k1 over SHA-256 of the message, compact 64-byte form.
    Secp256k1,
}

impl SignatureAlgorithm {
    /// One-byte wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Ed25519 => 0,
            Self::Secp256k1 => 1,
        }
    }

    /// Parse a keyring type name such as `ed25519` or `secp256k1`.
    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "secp256k1" | "ecdsa" => Ok(Self::Secp256k1),
            other => Err(CryptoError::InvalidInput(format!(
                "unsupported key type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::Secp256k1 => write!(f, "Secp256k1"),
        }
    }
}

/// Capability to sign on behalf of one controller DID.
///
/// Implemented by the local key types; a remote signer or hardware keyring
/// can implement it as well.
pub trait DidSigner: Send + Sync {
    /// Algorithm the produced signatures are tagged with.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Key the ledger should verify the signatures with.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

impl DidSigner for Ed25519KeyPair {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Ed25519
    }

    fn public_key(&self) -> PublicKey {
        Ed25519KeyPair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Ed25519KeyPair::sign(self, message).to_vec())
    }
}

impl DidSigner for Secp256k1KeyPair {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Secp256k1
    }

    fn public_key(&self) -> PublicKey {
        Secp256k1KeyPair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Secp256k1KeyPair::sign(self, message))
    }
}

impl DidSigner for KeyPair {
    fn algorithm(&self) -> SignatureAlgorithm {
        KeyPair::algorithm(self)
    }

    fn public_key(&self) -> PublicKey {
        KeyPair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            KeyPair::Ed25519(kp) => DidSigner::sign(kp, message),
            KeyPair::Secp256k1(kp) => DidSigner::sign(kp, message),
        }
    }
}

/// Verify a signature tagged with `algorithm` against `public_key`.
///
/// The tag must match the key's own algorithm.
pub fn verify(
    algorithm: SignatureAlgorithm,
    message: &[u8],
    signature: &[u8],
    public_key: &PublicKey,
) -> Result<(), CryptoError> {
    if public_key.algorithm() != algorithm {
        return Err(CryptoError::AlgorithmMismatch {
            expected: public_key.algorithm(),
            actual: algorithm,
        });
    }
    public_key.verify(message, signature)
}
