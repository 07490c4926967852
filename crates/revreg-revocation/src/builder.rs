use std::collections::BTreeSet;

use revreg_core::{Nonce, Policy, Registry, RegistryId, RevokeId};

use crate::error::RevocationError;
use crate::operation::{encode_message, OperationKind, OperationPayload, RevocationSetOperation};
use crate::proof::{build_proof, DidKeys};

/// Builds signed operations from a caller-owned key map.
///
/// All validation and signing happens here, before anything reaches a
/// transport.
pub struct OperationBuilder<'a> {
    keys: &'a DidKeys,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(keys: &'a DidKeys) -> Self {
        Self { keys }
    }

    /// Build and sign an operation of any kind against `policy`.
    pub fn build(
        &self,
        kind: OperationKind,
        registry_id: RegistryId,
        policy: &Policy,
        payload: OperationPayload,
        last_modified: Nonce,
    ) -> Result<RevocationSetOperation, RevocationError> {
        let message = encode_message(kind, &registry_id, &payload, last_modified)?;
        let proof = build_proof(policy, &message, self.keys)?;

        tracing::debug!(
            kind = %kind,
            registry = %registry_id,
            last_modified = %last_modified,
            signatures = proof.len(),
            "built registry operation"
        );

        Ok(RevocationSetOperation {
            kind,
            registry_id,
            payload,
            last_modified,
            proof,
        })
    }

    /// Create a registry. The new policy's controllers sign against the id's
    /// current counter: `Nonce::ZERO` for a fresh id, the removal block for a
    /// removed one.
    pub fn new_registry(
        &self,
        registry_id: RegistryId,
        registry: Registry,
        last_modified: Nonce,
    ) -> Result<RevocationSetOperation, RevocationError> {
        registry.policy.validate()?;
        let policy = registry.policy.clone();
        self.build(
            OperationKind::NewRegistry,
            registry_id,
            &policy,
            OperationPayload::Registry(registry),
            last_modified,
        )
    }

    pub fn revoke(
        &self,
        registry_id: RegistryId,
        policy: &Policy,
        ids: BTreeSet<RevokeId>,
        last_modified: Nonce,
    ) -> Result<RevocationSetOperation, RevocationError> {
        self.build(
            OperationKind::Revoke,
            registry_id,
            policy,
            OperationPayload::Ids(ids),
            last_modified,
        )
    }

    pub fn unrevoke(
        &self,
        registry_id: RegistryId,
        policy: &Policy,
        ids: BTreeSet<RevokeId>,
        last_modified: Nonce,
    ) -> Result<RevocationSetOperation, RevocationError> {
        self.build(
            OperationKind::Unrevoke,
            registry_id,
            policy,
            OperationPayload::Ids(ids),
            last_modified,
        )
    }

    pub fn remove_registry(
        &self,
        registry_id: RegistryId,
        policy: &Policy,
        last_modified: Nonce,
    ) -> Result<RevocationSetOperation, RevocationError> {
        self.build(
            OperationKind::RemoveRegistry,
            registry_id,
            policy,
            OperationPayload::None,
            last_modified,
        )
    }
}
