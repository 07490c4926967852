use std::collections::BTreeSet;
use std::sync::Arc;

use revreg_core::{Nonce, Registry, RegistryDetail, RegistryId, RevokeId};

use crate::builder::OperationBuilder;
use crate::error::RevocationError;
use crate::ledger::{LedgerTransport, StateReader, TransactionReceipt};
use crate::proof::DidKeys;

/// High-level registry client: builds, signs and submits operations, and
/// reads registry state back.
///
/// The registry's policy is read from the ledger. The `last_modified` the
/// caller passes is echoed unchanged, so a caller working from an outdated
/// read gets `StaleNonce` instead of a silent overwrite.
pub struct RegistryClient<L> {
    ledger: Arc<L>,
}

impl<L> Clone for RegistryClient<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L> RegistryClient<L>
where
    L: LedgerTransport + StateReader,
{
    pub fn new(ledger: L) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Create `registry` under `registry_id`, signed by all its controllers
    /// against the id's current counter.
    pub async fn new_registry(
        &self,
        registry_id: RegistryId,
        registry: Registry,
        keys: &DidKeys,
    ) -> Result<TransactionReceipt, RevocationError> {
        let state = self.ledger.get_registry_state(&registry_id).await?;
        let op = OperationBuilder::new(keys).new_registry(
            registry_id,
            registry,
            state.last_modified(),
        )?;
        self.ledger.submit(&op).await
    }

    pub async fn revoke(
        &self,
        registry_id: RegistryId,
        ids: BTreeSet<RevokeId>,
        last_modified: Nonce,
        keys: &DidKeys,
    ) -> Result<TransactionReceipt, RevocationError> {
        let registry = self.get_revocation_registry(&registry_id).await?;
        let op = OperationBuilder::new(keys).revoke(
            registry_id,
            &registry.policy,
            ids,
            last_modified,
        )?;
        self.ledger.submit(&op).await
    }

    /// Fails with `AddOnlyViolation` on add-only registries.
    pub async fn unrevoke(
        &self,
        registry_id: RegistryId,
        ids: BTreeSet<RevokeId>,
        last_modified: Nonce,
        keys: &DidKeys,
    ) -> Result<TransactionReceipt, RevocationError> {
        let registry = self.get_revocation_registry(&registry_id).await?;
        let op = OperationBuilder::new(keys).unrevoke(
            registry_id,
            &registry.policy,
            ids,
            last_modified,
        )?;
        self.ledger.submit(&op).await
    }

    /// Fails with `AddOnlyViolation` on add-only registries.
    pub async fn remove_registry(
        &self,
        registry_id: RegistryId,
        last_modified: Nonce,
        keys: &DidKeys,
    ) -> Result<TransactionReceipt, RevocationError> {
        let registry = self.get_revocation_registry(&registry_id).await?;
        let op = OperationBuilder::new(keys).remove_registry(
            registry_id,
            &registry.policy,
            last_modified,
        )?;
        self.ledger.submit(&op).await
    }

    pub async fn get_registry_detail(
        &self,
        registry_id: &RegistryId,
    ) -> Result<RegistryDetail, RevocationError> {
        self.ledger.get_registry_detail(registry_id).await
    }

    /// The registry record without its counter.
    pub async fn get_revocation_registry(
        &self,
        registry_id: &RegistryId,
    ) -> Result<Registry, RevocationError> {
        Ok(self.ledger.get_registry_detail(registry_id).await?.registry)
    }

    pub async fn get_is_revoked(
        &self,
        registry_id: &RegistryId,
        revoke_id: &RevokeId,
    ) -> Result<bool, RevocationError> {
        self.ledger.get_is_revoked(registry_id, revoke_id).await
    }

    /// Counter to pass into the next state change of `registry_id`.
    pub async fn last_modified(&self, registry_id: &RegistryId) -> Result<Nonce, RevocationError> {
        Ok(self.ledger.get_registry_detail(registry_id).await?.last_modified)
    }
}
