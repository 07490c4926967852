use std::fmt;

use crate::error::CoreError;
use crate::types::Nonce;

/// Lifecycle states of a revocation registry on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RegistryState {
    /// No registry has ever been created under the id.
    Absent,
    /// Registry exists and accepts state changes.
    Active { add_only: bool, last_modified: Nonce },
    /// Registry was removed at `last_modified`; the id may be created again
    /// against that counter.
    Removed { last_modified: Nonce },
}

impl RegistryState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// The counter a client must echo back for its next change.
    pub fn last_modified(&self) -> Nonce {
        match self {
            Self::Active { last_modified, .. } | Self::Removed { last_modified } => *last_modified,
            Self::Absent => Nonce::ZERO,
        }
    }
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Active {
                add_only,
                last_modified,
            } => write!(f, "Active(add_only={}, last_modified={})", add_only, last_modified),
            Self::Removed { last_modified } => {
                write!(f, "Removed(last_modified={})", last_modified)
            }
        }
    }
}

/// Events that trigger registry state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RegistryEvent {
    Create { add_only: bool },
    Revoke,
    Unrevoke,
    Remove,
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// Create on an id that is already active.
    AlreadyExists,
    /// Change on an id with no active registry.
    NotFound,
    /// Unrevoke or remove on an add-only registry.
    AddOnly,
}

/// Registry state transitions as enforced by the ledger.
///
/// Valid transitions:
/// - Absent → Active (Create)
/// - Removed → Active (Create)
/// - Active → Active (Revoke)
/// - Active(add_only = false) → Active (Unrevoke)
/// - Active(add_only = false) → Removed (Remove)
///
/// Removal stamps the state with `at`, so a create signed before the removal
/// no longer carries the counter the ledger expects.
///
/// Authorization and nonce checks are not part of this table; callers run
/// them after a transition is known to be structurally allowed.
pub struct RegistryStateMachine;

impl RegistryStateMachine {
    /// Attempt a transition, stamping an active result with `at`.
    pub fn transition(
        current: RegistryState,
        event: RegistryEvent,
        at: Nonce,
    ) -> Result<RegistryState, CoreError> {
        let new_state = match (current, event) {
            (
                RegistryState::Absent | RegistryState::Removed { .. },
                RegistryEvent::Create { add_only },
            ) => {
                RegistryState::Active {
                    add_only,
                    last_modified: at,
                }
            }
            (RegistryState::Active { .. }, RegistryEvent::Create { .. }) => {
                return Err(Self::reject(current, event, TransitionRejection::AlreadyExists));
            }

            (RegistryState::Active { add_only, .. }, RegistryEvent::Revoke) => {
                RegistryState::Active {
                    add_only,
                    last_modified: at,
                }
            }

            (RegistryState::Active { add_only: true, .. }, RegistryEvent::Unrevoke)
            | (RegistryState::Active { add_only: true, .. }, RegistryEvent::Remove) => {
                return Err(Self::reject(current, event, TransitionRejection::AddOnly));
            }
            (RegistryState::Active { add_only: false, .. }, RegistryEvent::Unrevoke) => {
                RegistryState::Active {
                    add_only: false,
                    last_modified: at,
                }
            }
            (RegistryState::Active { add_only: false, .. }, RegistryEvent::Remove) => {
                RegistryState::Removed { last_modified: at }
            }

            (RegistryState::Absent | RegistryState::Removed { .. }, _) => {
                return Err(Self::reject(current, event, TransitionRejection::NotFound));
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "registry state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: RegistryState, event: RegistryEvent) -> bool {
        Self::transition(current, event, current.last_modified()).is_ok()
    }

    fn reject(
        from: RegistryState,
        event: RegistryEvent,
        rejection: TransitionRejection,
    ) -> CoreError {
        CoreError::InvalidStateTransition {
            from,
            event,
            rejection,
        }
    }
}
