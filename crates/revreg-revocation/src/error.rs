use revreg_core::{CoreError, Did, Nonce, RegistryId, TransitionRejection};
use revreg_crypto::CryptoError;

use crate::operation::OperationKind;

/// Errors raised while building, submitting, or applying registry operations.
///
/// Ledger-side rejections keep their cause so callers can tell
/// "re-read and retry" (`StaleNonce`) apart from "fix your signers"
/// (`ProofNotSatisfying`) and from mode violations.
#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("no signing key for controller {0}")]
    MissingSignerKey(Did),

    #[error("policy has no controllers")]
    EmptyControllerSet,

    #[error("payload does not match {kind} operation: {reason}")]
    PayloadKindMismatch { kind: OperationKind, reason: String },

    #[error("stale nonce: registry last modified at {expected}, operation built against {found}")]
    StaleNonce { expected: Nonce, found: Nonce },

    #[error("proof does not satisfy registry policy: {0}")]
    ProofNotSatisfying(String),

    #[error("registry {0} is add-only")]
    AddOnlyViolation(RegistryId),

    #[error("registry {0} already exists")]
    AlreadyExists(RegistryId),

    #[error("registry {0} not found")]
    NotFound(RegistryId),

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("core error: {0}")]
    Core(CoreError),
}

impl RevocationError {
    /// Whether resubmitting the same operation unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }

    /// Map a lifecycle error for `registry_id` onto the ledger taxonomy.
    pub fn from_transition(err: CoreError, registry_id: RegistryId) -> Self {
        match err {
            CoreError::InvalidStateTransition { rejection, .. } => match rejection {
                TransitionRejection::AlreadyExists => Self::AlreadyExists(registry_id),
                TransitionRejection::NotFound => Self::NotFound(registry_id),
                TransitionRejection::AddOnly => Self::AddOnlyViolation(registry_id),
            },
            other => Self::from(other),
        }
    }
}

impl From<CoreError> for RevocationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidPolicy(reason) => Self::InvalidPolicy(reason),
            other => Self::Core(other),
        }
    }
}
