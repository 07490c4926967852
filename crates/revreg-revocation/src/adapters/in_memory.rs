use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use revreg_core::{
    Did, Nonce, Registry, RegistryDetail, RegistryEvent, RegistryId, RegistryState,
    RegistryStateMachine, RevokeId,
};
use revreg_crypto::PublicKey;

use crate::error::RevocationError;
use crate::ledger::{LedgerTransport, StateReader, TransactionReceipt};
use crate::operation::{OperationPayload, RevocationSetOperation};
use crate::proof::verify_proof;

/// Largest revoke id set accepted in one operation by default.
pub const DEFAULT_BATCH_LIMIT: usize = 1024;

/// Per-id ledger record. Kept after removal so the id remembers its state.
#[derive(Debug, Clone)]
struct RegistryRecord {
    state: RegistryState,
    registry: Option<Registry>,
    revoked: BTreeSet<RevokeId>,
}

impl RegistryRecord {
    fn absent() -> Self {
        Self {
            state: RegistryState::Absent,
            registry: None,
            revoked: BTreeSet::new(),
        }
    }
}

/// In-process ledger enforcing the registry rules.
///
/// Every accepted operation takes the next block number, which becomes the
/// registry's `last_modified`. Numbers consumed by rejected submissions are
/// skipped. Useful for tests and local tooling that need ledger semantics
/// without a node.
pub struct InMemoryLedger {
    registries: DashMap<RegistryId, RegistryRecord>,
    /// DID → registered verification key.
    dids: DashMap<Did, PublicKey>,
    block: AtomicU64,
    offline: AtomicBool,
    batch_limit: usize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            registries: DashMap::new(),
            dids: DashMap::new(),
            block: AtomicU64::new(0),
            offline: AtomicBool::new(false),
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }

    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    /// Register (or rotate) the verification key of a DID.
    pub fn register_did(&self, did: Did, key: PublicKey) {
        tracing::debug!(did = %did, algorithm = %key.algorithm(), "DID key registered");
        self.dids.insert(did, key);
    }

    /// Simulate a lost connection; submissions and queries fail with
    /// `ConnectionError` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Latest block number handed out.
    pub fn block_height(&self) -> Nonce {
        Nonce(self.block.load(Ordering::SeqCst))
    }

    /// Lifecycle state of an id, `Absent` if never seen.
    pub fn registry_state(&self, registry_id: &RegistryId) -> RegistryState {
        self.registries
            .get(registry_id)
            .map(|record| record.state)
            .unwrap_or(RegistryState::Absent)
    }

    fn ensure_online(&self) -> Result<(), RevocationError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RevocationError::ConnectionError("ledger unreachable".into()))
        } else {
            Ok(())
        }
    }

    fn next_block(&self) -> Nonce {
        Nonce(self.block.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Validate and apply one operation. Synchronous so no map guard is held
    /// across an await point.
    fn apply(&self, op: &RevocationSetOperation) -> Result<TransactionReceipt, RevocationError> {
        self.ensure_online()?;

        if let Some(ids) = op.ids() {
            if ids.len() > self.batch_limit {
                return Err(RevocationError::TransactionRejected(format!(
                    "{} revoke ids exceed batch limit of {}",
                    ids.len(),
                    self.batch_limit
                )));
            }
        }

        let event = op.event()?;
        let message = op.message()?;
        let tx_hash = revreg_crypto::hash(&op.to_bytes()?);
        let block = self.next_block();

        let result = {
            let mut record = self
                .registries
                .entry(op.registry_id)
                .or_insert_with(RegistryRecord::absent);
            self.apply_to_record(&mut *record, op, event, &message, block)
        };

        if result.is_err() {
            self.registries
                .remove_if(&op.registry_id, |_, record| record.state == RegistryState::Absent);
        }
        result?;

        Ok(TransactionReceipt {
            tx_hash,
            block,
            kind: op.kind,
            registry_id: op.registry_id,
        })
    }

    fn apply_to_record(
        &self,
        record: &mut RegistryRecord,
        op: &RevocationSetOperation,
        event: RegistryEvent,
        message: &[u8],
        block: Nonce,
    ) -> Result<(), RevocationError> {
        let next_state = RegistryStateMachine::transition(record.state, event, block)
            .map_err(|e| RevocationError::from_transition(e, op.registry_id))?;

        let policy = match (&op.payload, &record.registry) {
            (OperationPayload::Registry(registry), _) => {
                registry.policy.validate()?;
                registry.policy.clone()
            }
            (_, Some(existing)) => existing.policy.clone(),
            (_, None) => return Err(RevocationError::NotFound(op.registry_id)),
        };

        let expected = record.state.last_modified();
        if op.last_modified != expected {
            return Err(RevocationError::StaleNonce {
                expected,
                found: op.last_modified,
            });
        }

        verify_proof(&policy, message, &op.proof, |did| {
            self.dids.get(did).map(|key| key.value().clone())
        })?;

        match &op.payload {
            OperationPayload::Registry(registry) => {
                record.registry = Some(registry.clone());
                record.revoked.clear();
            }
            OperationPayload::Ids(ids) => {
                if event == RegistryEvent::Revoke {
                    record.revoked.extend(ids.iter().copied());
                } else {
                    record.revoked.retain(|id| !ids.contains(id));
                }
            }
            OperationPayload::None => {
                record.registry = None;
                record.revoked.clear();
            }
        }
        record.state = next_state;
        Ok(())
    }

    fn active_record<T>(
        &self,
        registry_id: &RegistryId,
        read: impl FnOnce(&Registry, &RegistryRecord) -> T,
    ) -> Result<T, RevocationError> {
        self.ensure_online()?;
        let record = self
            .registries
            .get(registry_id)
            .ok_or(RevocationError::NotFound(*registry_id))?;
        match (&record.state, &record.registry) {
            (RegistryState::Active { .. }, Some(registry)) => Ok(read(registry, &record)),
            _ => Err(RevocationError::NotFound(*registry_id)),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerTransport for InMemoryLedger {
    async fn submit(
        &self,
        operation: &RevocationSetOperation,
    ) -> Result<TransactionReceipt, RevocationError> {
        match self.apply(operation) {
            Ok(receipt) => {
                tracing::info!(
                    kind = %receipt.kind,
                    registry = %receipt.registry_id,
                    block = %receipt.block,
                    tx = %receipt.tx_hash_hex(),
                    "operation accepted"
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(
                    kind = %operation.kind,
                    registry = %operation.registry_id,
                    error = %e,
                    "operation rejected"
                );
                Err(e)
            }
        }
    }
}

#[async_trait]
impl StateReader for InMemoryLedger {
    async fn get_registry_detail(
        &self,
        registry_id: &RegistryId,
    ) -> Result<RegistryDetail, RevocationError> {
        self.active_record(registry_id, |registry, record| RegistryDetail {
            registry: registry.clone(),
            last_modified: record.state.last_modified(),
        })
    }

    async fn get_registry_state(
        &self,
        registry_id: &RegistryId,
    ) -> Result<RegistryState, RevocationError> {
        self.ensure_online()?;
        Ok(self.registry_state(registry_id))
    }

    async fn get_is_revoked(
        &self,
        registry_id: &RegistryId,
        revoke_id: &RevokeId,
    ) -> Result<bool, RevocationError> {
        self.active_record(registry_id, |_, record| record.revoked.contains(revoke_id))
    }
}
