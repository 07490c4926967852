use crate::signing::SignatureAlgorithm;

/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("algorithm mismatch: expected {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: SignatureAlgorithm,
        actual: SignatureAlgorithm,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
