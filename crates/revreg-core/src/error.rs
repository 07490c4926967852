use crate::registry_state::{RegistryEvent, RegistryState, TransitionRejection};

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid {kind}: {reason}")]
    InvalidIdentifier { kind: &'static str, reason: String },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid registry transition: {event:?} not allowed from {from} ({rejection:?})")]
    InvalidStateTransition {
        from: RegistryState,
        event: RegistryEvent,
        rejection: TransitionRejection,
    },

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
