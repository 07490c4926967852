use revreg_crypto::CryptoError;

/// Errors raised while creating or checking linked-data proofs.
#[derive(Debug, thiserror::Error)]
pub enum LdpError {
    #[error("document must be a JSON object")]
    InvalidDocument,

    #[error("document has no proof")]
    MissingProof,

    #[error("unsupported proof type: expected {expected}, found {found}")]
    UnsupportedProofType { expected: &'static str, found: String },

    #[error("unsupported JWS algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("key type mismatch: suite requires {expected}, key is {found}")]
    KeyTypeMismatch { expected: &'static str, found: String },

    #[error("proof verification method {proof} does not match key {key}")]
    VerificationMethodMismatch { proof: String, key: String },

    #[error("invalid JWS: {0}")]
    InvalidJws(String),

    #[error("suite has no signer")]
    NoSigner,

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
