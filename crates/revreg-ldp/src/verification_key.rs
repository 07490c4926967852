use serde::{Deserialize, Serialize};

use revreg_crypto::{PublicKey, Secp256k1KeyPair, SignatureAlgorithm};

use crate::error::LdpError;

/// Verification method type name required by the secp256k1 suite.
pub const KEY_TYPE: &str = "EcdsaSecp256k1VerificationKey2019";

/// Verification method carrying a compressed secp256k1 public key as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcdsaSecp256k1VerificationKey2019 {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: String,
    pub controller: String,
    pub public_key_hex: String,
}

impl EcdsaSecp256k1VerificationKey2019 {
    pub fn new(id: impl Into<String>, controller: impl Into<String>, key: &PublicKey) -> Self {
        Self {
            id: id.into(),
            key_type: KEY_TYPE.to_string(),
            controller: controller.into(),
            public_key_hex: hex::encode(key.to_bytes()),
        }
    }

    pub fn from_keypair(
        id: impl Into<String>,
        controller: impl Into<String>,
        keypair: &Secp256k1KeyPair,
    ) -> Self {
        Self::new(id, controller, &keypair.public_key())
    }

    /// Decode the embedded key.
    pub fn public_key(&self) -> Result<PublicKey, LdpError> {
        Ok(PublicKey::from_hex(SignatureAlgorithm::Secp256k1, &self.public_key_hex)?)
    }
}
