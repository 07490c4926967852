//! Integration test: client configuration from the process environment
//! feeding the account key used to sign registry operations.
//!
//! Kept in its own test binary because it mutates process-wide variables.

use revreg_core::config::{ENV_ACCOUNT_URI, ENV_ENDPOINT, ENV_KEY_TYPE};
use revreg_core::{ClientConfig, Did, Policy, Registry, RegistryId};
use revreg_crypto::SignatureAlgorithm;
use revreg_revocation::{account_keypair, DidKeys, InMemoryLedger, RegistryClient};

#[tokio::test]
async fn test_env_overrides_select_signing_account() {
    std::env::set_var(ENV_ENDPOINT, "ws://10.0.0.7:9944");
    std::env::set_var(ENV_KEY_TYPE, "secp256k1");
    std::env::set_var(ENV_ACCOUNT_URI, "//Dave");

    let mut config = ClientConfig::default();
    config.apply_env();
    assert_eq!(config.node.endpoint, "ws://10.0.0.7:9944");
    assert_eq!(config.keyring.key_type, "secp256k1");
    assert_eq!(config.keyring.account_uri, "//Dave");

    let account = account_keypair(&config.keyring).unwrap();
    assert_eq!(account.algorithm(), SignatureAlgorithm::Secp256k1);
    assert_ne!(
        account.public_key(),
        account_keypair(&ClientConfig::default().keyring)
            .unwrap()
            .public_key()
    );

    // the configured account controls a registry end to end
    let ledger = InMemoryLedger::new();
    let did = Did::random();
    ledger.register_did(did, account.public_key());
    let mut keys = DidKeys::new();
    keys.insert(did, account);

    let client = RegistryClient::new(ledger);
    let registry_id = RegistryId::random();
    client
        .new_registry(
            registry_id,
            Registry::new(Policy::one_of([did]).unwrap(), false),
            &keys,
        )
        .await
        .unwrap();
    assert!(client.get_registry_detail(&registry_id).await.is_ok());

    std::env::remove_var(ENV_ENDPOINT);
    std::env::remove_var(ENV_KEY_TYPE);
    std::env::remove_var(ENV_ACCOUNT_URI);

    let mut config = ClientConfig::default();
    config.apply_env();
    assert_eq!(config.node.endpoint, "ws://localhost:9944");
    assert_eq!(config.keyring.key_type, "ed25519");
}
