use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use revreg_core::codec::put_len;
use revreg_core::{Did, Nonce, Registry, RegistryEvent, RegistryId, RevokeId};
use revreg_crypto::SignatureAlgorithm;

use crate::error::RevocationError;

/// Kind of registry state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    NewRegistry,
    Revoke,
    Unrevoke,
    RemoveRegistry,
}

impl OperationKind {
    /// One-byte tag leading the signed message.
    pub fn tag(&self) -> u8 {
        match self {
            Self::NewRegistry => 0,
            Self::Revoke => 1,
            Self::Unrevoke => 2,
            Self::RemoveRegistry => 3,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewRegistry => write!(f, "newRegistry"),
            Self::Revoke => write!(f, "revoke"),
            Self::Unrevoke => write!(f, "unrevoke"),
            Self::RemoveRegistry => write!(f, "removeRegistry"),
        }
    }
}

/// Data carried by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationPayload {
    /// The record a `NewRegistry` operation creates.
    Registry(Registry),
    /// Revoke ids for `Revoke` / `Unrevoke`.
    Ids(BTreeSet<RevokeId>),
    /// `RemoveRegistry` carries nothing.
    None,
}

impl OperationPayload {
    fn describe(&self) -> &'static str {
        match self {
            Self::Registry(_) => "registry record",
            Self::Ids(_) => "revoke id set",
            Self::None => "no payload",
        }
    }
}

/// One controller's signature over the operation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry {
    pub controller: Did,
    pub algorithm: SignatureAlgorithm,
    pub signature: Vec<u8>,
}

/// A signed, submission-ready registry state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationSetOperation {
    pub kind: OperationKind,
    pub registry_id: RegistryId,
    pub payload: OperationPayload,
    /// Registry counter observed when the proof was built.
    pub last_modified: Nonce,
    /// Signatures ordered by ascending controller bytes.
    pub proof: Vec<ProofEntry>,
}

/// Reject payloads that do not belong to `kind`.
pub fn check_payload(kind: OperationKind, payload: &OperationPayload) -> Result<(), RevocationError> {
    let matches = matches!(
        (kind, payload),
        (OperationKind::NewRegistry, OperationPayload::Registry(_))
            | (OperationKind::Revoke, OperationPayload::Ids(_))
            | (OperationKind::Unrevoke, OperationPayload::Ids(_))
            | (OperationKind::RemoveRegistry, OperationPayload::None)
    );
    if matches {
        Ok(())
    } else {
        Err(RevocationError::PayloadKindMismatch {
            kind,
            reason: format!("unexpected {}", payload.describe()),
        })
    }
}

/// Canonical bytes signed by every controller and re-derived by the ledger:
/// kind tag, registry id, payload, then `last_modified` little-endian.
pub fn encode_message(
    kind: OperationKind,
    registry_id: &RegistryId,
    payload: &OperationPayload,
    last_modified: Nonce,
) -> Result<Vec<u8>, RevocationError> {
    check_payload(kind, payload)?;

    let mut out = Vec::with_capacity(1 + 32 + 8 + 64);
    out.push(kind.tag());
    out.extend_from_slice(registry_id.as_bytes());
    match payload {
        OperationPayload::Registry(registry) => out.extend_from_slice(&registry.to_bytes()),
        OperationPayload::Ids(ids) => {
            put_len(&mut out, ids.len());
            // BTreeSet iterates ascending
            for id in ids {
                out.extend_from_slice(id.as_bytes());
            }
        }
        OperationPayload::None => {}
    }
    out.extend_from_slice(&last_modified.to_le_bytes());
    Ok(out)
}

impl RevocationSetOperation {
    /// The canonical message this operation's proof signs.
    pub fn message(&self) -> Result<Vec<u8>, RevocationError> {
        encode_message(self.kind, &self.registry_id, &self.payload, self.last_modified)
    }

    /// Revoke ids targeted, if any.
    pub fn ids(&self) -> Option<&BTreeSet<RevokeId>> {
        match &self.payload {
            OperationPayload::Ids(ids) => Some(ids),
            _ => None,
        }
    }

    /// Controllers that contributed a signature.
    pub fn signers(&self) -> BTreeSet<Did> {
        self.proof.iter().map(|entry| entry.controller).collect()
    }

    /// Lifecycle event this operation drives.
    pub fn event(&self) -> Result<RegistryEvent, RevocationError> {
        check_payload(self.kind, &self.payload)?;
        Ok(match (&self.kind, &self.payload) {
            (OperationKind::NewRegistry, OperationPayload::Registry(registry)) => {
                RegistryEvent::Create {
                    add_only: registry.add_only,
                }
            }
            (OperationKind::Revoke, _) => RegistryEvent::Revoke,
            (OperationKind::Unrevoke, _) => RegistryEvent::Unrevoke,
            _ => RegistryEvent::Remove,
        })
    }

    /// Message followed by the encoded proof; hashed into transaction ids.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RevocationError> {
        let mut out = self.message()?;
        put_len(&mut out, self.proof.len());
        for entry in &self.proof {
            out.extend_from_slice(entry.controller.as_bytes());
            out.push(entry.algorithm.tag());
            put_len(&mut out, entry.signature.len());
            out.extend_from_slice(&entry.signature);
        }
        Ok(out)
    }
}
