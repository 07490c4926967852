use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::signing::SignatureAlgorithm;

/// Ed25519 key pair.
/// Private key material is zeroized on drop by ed25519-dalek.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create a key pair from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let mut seed: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        let kp = Self::from_seed(&seed);
        seed.zeroize();
        Ok(kp)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(self.signing_key.verifying_key())
    }

    /// Get the raw private key bytes (32 bytes).
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

/// ECDSA secp256k1 key pair.
pub struct Secp256k1KeyPair {
    signing_key: k256::ecdsa::SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: k256::ecdsa::SigningKey::random(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte big-endian scalar.
    ///
    /// Fails for zero or for values not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let signing_key = k256::ecdsa::SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid secp256k1 scalar: {}", e)))?;
        Ok(Self { signing_key })
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::Secp256k1(k256::ecdsa::VerifyingKey::from(&self.signing_key))
    }

    /// Get the raw private scalar (32 bytes, big-endian).
    pub fn secret_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Sign a message (SHA-256 applied internally), returning the 64-byte
    /// compact `r || s` signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let sig: k256::ecdsa::Signature = self.signing_key.sign(message);
        sig.to_bytes().to_vec()
    }

    /// Sign an already computed 32-byte digest, returning a DER signature.
    pub fn sign_prehash_der(&self, digest: &[u8; 32]) -> Result<Vec<u8>, CryptoError> {
        let sig: k256::ecdsa::Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;
        Ok(sig.to_der().as_bytes().to_vec())
    }
}

/// A key pair of either supported algorithm.
pub enum KeyPair {
    Ed25519(Ed25519KeyPair),
    Secp256k1(Secp256k1KeyPair),
}

impl KeyPair {
    /// Generate a fresh key pair for `algorithm`.
    pub fn generate(algorithm: SignatureAlgorithm) -> Self {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Self::Ed25519(Ed25519KeyPair::generate()),
            SignatureAlgorithm::Secp256k1 => Self::Secp256k1(Secp256k1KeyPair::generate()),
        }
    }

    /// Deterministically derive a key pair for `algorithm` from a seed.
    pub fn from_seed(algorithm: SignatureAlgorithm, seed: &[u8; 32]) -> Result<Self, CryptoError> {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Ok(Self::Ed25519(Ed25519KeyPair::from_seed(seed))),
            SignatureAlgorithm::Secp256k1 => {
                Ok(Self::Secp256k1(Secp256k1KeyPair::from_bytes(seed)?))
            }
        }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::Ed25519(_) => SignatureAlgorithm::Ed25519,
            Self::Secp256k1(_) => SignatureAlgorithm::Secp256k1,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519(kp) => kp.public_key(),
            Self::Secp256k1(kp) => kp.public_key(),
        }
    }
}

/// Public verification key of either supported algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    /// Decode from raw bytes: 32 bytes for Ed25519, SEC1 (33 or 65 bytes) for secp256k1.
    pub fn from_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            SignatureAlgorithm::Ed25519 => {
                let arr: [u8; 32] =
                    bytes
                        .try_into()
                        .map_err(|_| CryptoError::InvalidKeyLength {
                            expected: 32,
                            actual: bytes.len(),
                        })?;
                let key = ed25519_dalek::VerifyingKey::from_bytes(&arr)
                    .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {}", e)))?;
                Ok(Self::Ed25519(key))
            }
            SignatureAlgorithm::Secp256k1 => {
                let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                    .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {}", e)))?;
                Ok(Self::Secp256k1(key))
            }
        }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::Ed25519(_) => SignatureAlgorithm::Ed25519,
            Self::Secp256k1(_) => SignatureAlgorithm::Secp256k1,
        }
    }

    /// Raw bytes: 32 for Ed25519, compressed SEC1 (33) for secp256k1.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.as_bytes().to_vec(),
            Self::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode from hex string.
    pub fn from_hex(algorithm: SignatureAlgorithm, hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_bytes(algorithm, &bytes)
    }

    /// Encode as base58.
    pub fn to_bs58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Verify a signature over `message` produced by the matching key pair's `sign`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Ed25519(key) => {
                let sig = ed25519_dalek::Signature::from_slice(signature).map_err(|_| {
                    CryptoError::InvalidInput(format!(
                        "ed25519 signature must be 64 bytes, got {}",
                        signature.len()
                    ))
                })?;
                key.verify_strict(message, &sig)
                    .map_err(|_| CryptoError::SignatureVerificationFailed)
            }
            Self::Secp256k1(key) => {
                let sig = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| CryptoError::InvalidInput(format!("invalid signature: {}", e)))?;
                key.verify(message, &sig)
                    .map_err(|_| CryptoError::SignatureVerificationFailed)
            }
        }
    }

    /// Verify a DER signature over a precomputed digest (secp256k1 only).
    pub fn verify_prehash_der(&self, digest: &[u8; 32], der: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Secp256k1(key) => {
                let sig = k256::ecdsa::Signature::from_der(der)
                    .map_err(|e| CryptoError::InvalidInput(format!("invalid DER: {}", e)))?;
                key.verify_prehash(digest, &sig)
                    .map_err(|_| CryptoError::SignatureVerificationFailed)
            }
            Self::Ed25519(_) => Err(CryptoError::AlgorithmMismatch {
                expected: SignatureAlgorithm::Secp256k1,
                actual: SignatureAlgorithm::Ed25519,
            }),
        }
    }
}
