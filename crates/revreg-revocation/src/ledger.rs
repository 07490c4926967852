use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use revreg_core::{Nonce, RegistryDetail, RegistryId, RegistryState, RevokeId};

use crate::error::RevocationError;
use crate::operation::{OperationKind, RevocationSetOperation};

/// Ledger acknowledgement of an accepted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// BLAKE3 of the operation message and proof.
    pub tx_hash: [u8; 32],
    /// Block the operation was included in; the registry's new `last_modified`
    /// unless the operation removed it.
    pub block: Nonce,
    pub kind: OperationKind,
    pub registry_id: RegistryId,
}

impl TransactionReceipt {
    pub fn tx_hash_hex(&self) -> String {
        hex::encode(self.tx_hash)
    }
}

/// Submission side of a ledger.
///
/// Implementations bridge to a concrete node (websocket RPC, in-process
/// ledger, ...). `ConnectionError` is the only retryable failure; every other
/// error means the operation must be rebuilt.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Submit a signed operation and wait for its inclusion.
    async fn submit(
        &self,
        operation: &RevocationSetOperation,
    ) -> Result<TransactionReceipt, RevocationError>;
}

/// Read-only view of registry state, eventually consistent with accepted
/// submissions.
#[async_trait]
pub trait StateReader: Send + Sync {
    /// Registry record and its current modification counter.
    async fn get_registry_detail(
        &self,
        registry_id: &RegistryId,
    ) -> Result<RegistryDetail, RevocationError>;

    /// Lifecycle state of an id, including the counter a create must echo
    /// for an id that is absent or removed.
    async fn get_registry_state(
        &self,
        registry_id: &RegistryId,
    ) -> Result<RegistryState, RevocationError>;

    /// Whether `revoke_id` is revoked in an existing registry.
    async fn get_is_revoked(
        &self,
        registry_id: &RegistryId,
        revoke_id: &RevokeId,
    ) -> Result<bool, RevocationError>;
}
