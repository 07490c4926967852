//! Integration test: registry lifecycle against the in-memory ledger.
//!
//! Drives revreg-core policies through revreg-revocation operations, signing
//! with revreg-crypto keys, the way a client would against a node.

use std::collections::BTreeSet;

use revreg_core::{
    telemetry, ClientConfig, Did, Nonce, Policy, Registry, RegistryId, RegistryState, RevokeId,
};
use revreg_crypto::{KeyPair, SignatureAlgorithm};
use revreg_revocation::{
    DidKeys, InMemoryLedger, LedgerTransport, OperationBuilder, RegistryClient, RevocationError,
    StateReader,
};

/// Helper: register `n` controllers of alternating key types on `ledger`.
/// Returns their DIDs and a key map holding all of them.
fn register_controllers(ledger: &InMemoryLedger, n: usize) -> (Vec<Did>, DidKeys) {
    let mut keys = DidKeys::new();
    let mut dids = Vec::new();
    for i in 0..n {
        let algorithm = if i % 2 == 0 {
            SignatureAlgorithm::Ed25519
        } else {
            SignatureAlgorithm::Secp256k1
        };
        let did = Did::random();
        let kp = KeyPair::generate(algorithm);
        ledger.register_did(did, kp.public_key());
        keys.insert(did, kp);
        dids.push(did);
    }
    (dids, keys)
}

fn revoke_ids(ids: &[RevokeId]) -> BTreeSet<RevokeId> {
    ids.iter().copied().collect()
}

fn client_with_controllers(n: usize) -> (RegistryClient<InMemoryLedger>, Vec<Did>, DidKeys) {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, n);
    (RegistryClient::new(ledger), dids, keys)
}

// =========================================================================
// Mutable registry
// =========================================================================

#[tokio::test]
async fn test_mutable_registry_full_lifecycle() {
    telemetry::init_tracing(&ClientConfig::default().logging);

    let (client, dids, keys) = client_with_controllers(1);
    let registry_id = RegistryId::random();
    let revoke_id = RevokeId::random();
    let policy = Policy::one_of(dids).expect("non-empty policy");

    client
        .new_registry(registry_id, Registry::new(policy.clone(), false), &keys)
        .await
        .expect("create should succeed");
    let registry = client
        .get_revocation_registry(&registry_id)
        .await
        .expect("registry should exist");
    assert_eq!(registry.policy, policy);
    assert!(!registry.add_only);

    // Revoke
    let detail = client.get_registry_detail(&registry_id).await.unwrap();
    let receipt = client
        .revoke(registry_id, revoke_ids(&[revoke_id]), detail.last_modified, &keys)
        .await
        .expect("revoke should succeed");
    assert!(client.get_is_revoked(&registry_id, &revoke_id).await.unwrap());
    assert_eq!(
        client.last_modified(&registry_id).await.unwrap(),
        receipt.block
    );

    // Unrevoke
    let last_modified = client.last_modified(&registry_id).await.unwrap();
    client
        .unrevoke(registry_id, revoke_ids(&[revoke_id]), last_modified, &keys)
        .await
        .expect("unrevoke should succeed");
    assert!(!client.get_is_revoked(&registry_id, &revoke_id).await.unwrap());

    // Remove
    let last_modified = client.last_modified(&registry_id).await.unwrap();
    client
        .remove_registry(registry_id, last_modified, &keys)
        .await
        .expect("remove should succeed");
    assert!(matches!(
        client.get_registry_detail(&registry_id).await,
        Err(RevocationError::NotFound(id)) if id == registry_id
    ));
}

#[tokio::test]
async fn test_double_revoke_is_accepted() {
    let (client, dids, keys) = client_with_controllers(1);
    let registry_id = RegistryId::random();
    let revoke_id = RevokeId::random();
    client
        .new_registry(
            registry_id,
            Registry::new(Policy::one_of(dids).unwrap(), false),
            &keys,
        )
        .await
        .unwrap();

    for _ in 0..2 {
        let last_modified = client.last_modified(&registry_id).await.unwrap();
        client
            .revoke(registry_id, revoke_ids(&[revoke_id]), last_modified, &keys)
            .await
            .expect("revoking an already revoked id is fine");
    }
    assert!(client.get_is_revoked(&registry_id, &revoke_id).await.unwrap());
}

// =========================================================================
// Add-only registry
// =========================================================================

#[tokio::test]
async fn test_add_only_registry_rejects_unrevoke_and_remove() {
    let (client, dids, keys) = client_with_controllers(1);
    let registry_id = RegistryId::random();
    let revoke_id = RevokeId::random();
    client
        .new_registry(
            registry_id,
            Registry::new(Policy::one_of(dids).unwrap(), true),
            &keys,
        )
        .await
        .unwrap();

    let last_modified = client.last_modified(&registry_id).await.unwrap();
    client
        .revoke(registry_id, revoke_ids(&[revoke_id]), last_modified, &keys)
        .await
        .expect("revoke is allowed on add-only registries");

    let last_modified = client.last_modified(&registry_id).await.unwrap();
    let result = client
        .unrevoke(registry_id, revoke_ids(&[revoke_id]), last_modified, &keys)
        .await;
    assert!(matches!(result, Err(RevocationError::AddOnlyViolation(_))));
    assert!(client.get_is_revoked(&registry_id, &revoke_id).await.unwrap());

    let result = client.remove_registry(registry_id, last_modified, &keys).await;
    assert!(matches!(result, Err(RevocationError::AddOnlyViolation(_))));
    assert!(client.get_registry_detail(&registry_id).await.is_ok());
    assert_eq!(
        client.last_modified(&registry_id).await.unwrap(),
        last_modified
    );
}

#[tokio::test]
async fn test_add_only_rejection_ignores_proof() {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, 1);
    let policy = Policy::one_of(dids).unwrap();
    let registry_id = RegistryId::random();
    let builder = OperationBuilder::new(&keys);
    let create = builder
        .new_registry(registry_id, Registry::new(policy.clone(), true), Nonce::ZERO)
        .unwrap();
    let created = ledger.submit(&create).await.unwrap();
    let revoke_id = RevokeId::random();
    let revoke = builder
        .revoke(registry_id, &policy, revoke_ids(&[revoke_id]), created.block)
        .unwrap();
    let current = ledger.submit(&revoke).await.unwrap().block;

    let unrevoke = builder
        .unrevoke(registry_id, &policy, revoke_ids(&[revoke_id]), current)
        .unwrap();
    let remove = builder.remove_registry(registry_id, &policy, current).unwrap();

    for op in [unrevoke, remove] {
        let mut unsigned = op.clone();
        unsigned.proof.clear();
        let result = ledger.submit(&unsigned).await;
        assert!(matches!(result, Err(RevocationError::AddOnlyViolation(_))));

        let mut forged = op;
        forged.last_modified = created.block;
        forged.proof[0].signature[0] ^= 0xff;
        let result = ledger.submit(&forged).await;
        assert!(matches!(result, Err(RevocationError::AddOnlyViolation(_))));
    }

    assert!(ledger.get_is_revoked(&registry_id, &revoke_id).await.unwrap());
    assert_eq!(
        ledger.get_registry_detail(&registry_id).await.unwrap().last_modified,
        current
    );
}

// =========================================================================
// Authorization and concurrency guards
// =========================================================================

#[tokio::test]
async fn test_every_controller_must_sign() {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, 2);
    let registry_id = RegistryId::random();
    let both = Policy::one_of(dids.clone()).unwrap();

    let create = OperationBuilder::new(&keys)
        .new_registry(registry_id, Registry::new(both, false), Nonce::ZERO)
        .unwrap();
    let receipt = ledger.submit(&create).await.unwrap();

    // signed only by the first controller
    let only_first = Policy::one_of([dids[0]]).unwrap();
    let op = OperationBuilder::new(&keys)
        .revoke(
            registry_id,
            &only_first,
            revoke_ids(&[RevokeId::random()]),
            receipt.block,
        )
        .unwrap();
    let result = ledger.submit(&op).await;
    assert!(matches!(result, Err(RevocationError::ProofNotSatisfying(_))));
}

#[test]
fn test_builder_needs_key_for_every_controller() {
    let ledger = InMemoryLedger::new();
    let (dids, mut keys) = register_controllers(&ledger, 2);
    keys.remove(&dids[1]);

    let result = OperationBuilder::new(&keys).new_registry(
        RegistryId::random(),
        Registry::new(Policy::one_of(dids.clone()).unwrap(), false),
        Nonce::ZERO,
    );
    assert!(matches!(
        result,
        Err(RevocationError::MissingSignerKey(did)) if did == dids[1]
    ));
}

#[tokio::test]
async fn test_stale_nonce_after_concurrent_write() {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, 1);
    let client = RegistryClient::new(ledger);
    let registry_id = RegistryId::random();
    client
        .new_registry(
            registry_id,
            Registry::new(Policy::one_of(dids).unwrap(), false),
            &keys,
        )
        .await
        .unwrap();

    let observed = client.last_modified(&registry_id).await.unwrap();
    let other_writer = client.clone();
    other_writer
        .revoke(registry_id, revoke_ids(&[RevokeId::random()]), observed, &keys)
        .await
        .unwrap();

    let result = client
        .revoke(registry_id, revoke_ids(&[RevokeId::random()]), observed, &keys)
        .await;
    let current = client.last_modified(&registry_id).await.unwrap();
    assert!(matches!(
        result,
        Err(RevocationError::StaleNonce { expected, found })
            if expected == current && found == observed
    ));

    // re-read and rebuild succeeds
    client
        .revoke(registry_id, revoke_ids(&[RevokeId::random()]), current, &keys)
        .await
        .expect("fresh nonce should be accepted");
}

#[tokio::test]
async fn test_connection_error_is_retryable() {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, 1);
    let op = OperationBuilder::new(&keys)
        .new_registry(
            RegistryId::random(),
            Registry::new(Policy::one_of(dids).unwrap(), false),
            Nonce::ZERO,
        )
        .unwrap();

    ledger.set_offline(true);
    let err = ledger.submit(&op).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        ledger.get_registry_detail(&op.registry_id).await,
        Err(RevocationError::ConnectionError(_))
    ));

    // the same operation goes through once the ledger is back
    ledger.set_offline(false);
    ledger.submit(&op).await.expect("retry should succeed");
}

#[tokio::test]
async fn test_captured_create_cannot_be_replayed_after_remove() {
    let ledger = InMemoryLedger::new();
    let (dids, keys) = register_controllers(&ledger, 2);
    let policy = Policy::one_of(dids).unwrap();
    let registry_id = RegistryId::random();
    let builder = OperationBuilder::new(&keys);

    let create = builder
        .new_registry(registry_id, Registry::new(policy.clone(), false), Nonce::ZERO)
        .unwrap();
    let created = ledger.submit(&create).await.unwrap();
    let remove = builder
        .remove_registry(registry_id, &policy, created.block)
        .unwrap();
    let removed = ledger.submit(&remove).await.unwrap();
    assert_eq!(
        ledger.get_registry_state(&registry_id).await.unwrap(),
        RegistryState::Removed {
            last_modified: removed.block
        }
    );

    let result = ledger.submit(&create).await;
    assert!(matches!(
        result,
        Err(RevocationError::StaleNonce { expected, found })
            if expected == removed.block && found == Nonce::ZERO
    ));
    assert!(matches!(
        ledger.get_registry_detail(&registry_id).await,
        Err(RevocationError::NotFound(_))
    ));

    // the controllers can still bring the id back deliberately
    let client = RegistryClient::new(ledger);
    client
        .new_registry(registry_id, Registry::new(policy, false), &keys)
        .await
        .expect("re-create against the removal block");
    assert!(client.last_modified(&registry_id).await.unwrap() > removed.block);
}

#[tokio::test]
async fn test_query_unknown_registry_is_not_found() {
    let ledger = InMemoryLedger::new();
    let result = ledger
        .get_is_revoked(&RegistryId::random(), &RevokeId::random())
        .await;
    assert!(matches!(result, Err(RevocationError::NotFound(_))));
}
