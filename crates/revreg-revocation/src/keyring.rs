use revreg_core::KeyringConfig;
use revreg_crypto::{sha256, KeyPair, SignatureAlgorithm};

use crate::error::RevocationError;

/// Key pair of the configured account.
///
/// The algorithm comes from `key_type`; the secret is the SHA-256 of
/// `account_uri`, so a development URI such as `//Alice` always yields the
/// same key. Not meant for production secrets.
pub fn account_keypair(config: &KeyringConfig) -> Result<KeyPair, RevocationError> {
    let algorithm = SignatureAlgorithm::from_name(&config.key_type)?;
    let seed = sha256(config.account_uri.as_bytes());
    let keypair = KeyPair::from_seed(algorithm, &seed)?;

    tracing::debug!(
        algorithm = %algorithm,
        account = %config.account_uri,
        "derived account key pair"
    );
    Ok(keypair)
}
