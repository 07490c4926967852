use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use revreg_crypto::{sha256, Secp256k1KeyPair};

use crate::error::LdpError;
use crate::proof::{
    detached_jws, signing_input, split_detached_jws, JwsHeader, LinkedDataProof, ProofPurpose,
};
use crate::verification_key::{EcdsaSecp256k1VerificationKey2019, KEY_TYPE};

/// A linked-data signature suite: builds proofs for JSON documents and checks
/// them against a verification method.
pub trait LinkedDataSignatureSuite {
    type VerificationKey;

    /// Value of the proof's `type` field.
    fn proof_type(&self) -> &'static str;

    fn create_proof(
        &self,
        document: &Value,
        purpose: ProofPurpose,
    ) -> Result<LinkedDataProof, LdpError>;

    fn verify_proof(&self, document: &Value, key: &Self::VerificationKey) -> Result<(), LdpError>;

    /// Return `document` with a fresh proof attached under `proof`.
    fn sign_document(&self, document: &Value, purpose: ProofPurpose) -> Result<Value, LdpError> {
        let proof = self.create_proof(document, purpose)?;
        let mut signed = document.clone();
        signed
            .as_object_mut()
            .ok_or(LdpError::InvalidDocument)?
            .insert("proof".to_string(), serde_json::to_value(proof)?);
        Ok(signed)
    }
}

/// Signer over arbitrary bytes: DER-encoded ECDSA secp256k1 over SHA-256.
pub struct Secp256k1Signer {
    keypair: Secp256k1KeyPair,
}

impl Secp256k1Signer {
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, LdpError> {
        Ok(self.keypair.sign_prehash_der(&sha256(data))?)
    }
}

/// `EcdsaSecp256k1Signature2019` linked-data signature suite, producing
/// detached JWS proofs with alg `ES256K`.
///
/// Documents are canonicalized with JCS (RFC 8785).
pub struct EcdsaSecp256k1Signature2019 {
    verification_method: String,
    signer: Option<Secp256k1Signer>,
}

impl EcdsaSecp256k1Signature2019 {
    pub const TYPE_NAME: &'static str = "EcdsaSecp256k1Signature2019";
    pub const ALG: &'static str = "ES256K";
    pub const REQUIRED_KEY_TYPE: &'static str = KEY_TYPE;

    /// A suite able to sign, with proofs pointing at `verification_method`.
    pub fn new(keypair: Secp256k1KeyPair, verification_method: impl Into<String>) -> Self {
        Self {
            verification_method: verification_method.into(),
            signer: Some(Self::signer_factory(keypair)),
        }
    }

    /// A suite that only verifies.
    pub fn verifier() -> Self {
        Self {
            verification_method: String::new(),
            signer: None,
        }
    }

    pub fn signer_factory(keypair: Secp256k1KeyPair) -> Secp256k1Signer {
        Secp256k1Signer { keypair }
    }

    pub fn verification_method(&self) -> &str {
        &self.verification_method
    }

    /// Sign `data` with the suite's key.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, LdpError> {
        self.signer.as_ref().ok_or(LdpError::NoSigner)?.sign(data)
    }
}

impl LinkedDataSignatureSuite for EcdsaSecp256k1Signature2019 {
    type VerificationKey = EcdsaSecp256k1VerificationKey2019;

    fn proof_type(&self) -> &'static str {
        Self::TYPE_NAME
    }

    /// Build a proof for `document` (any `proof` key it already has is
    /// ignored).
    fn create_proof(
        &self,
        document: &Value,
        purpose: ProofPurpose,
    ) -> Result<LinkedDataProof, LdpError> {
        let mut proof = LinkedDataProof {
            proof_type: Self::TYPE_NAME.to_string(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            verification_method: self.verification_method.clone(),
            proof_purpose: purpose,
            jws: None,
        };

        let verify_data = create_verify_data(document, &proof)?;
        let header_b64 = JwsHeader::unencoded(Self::ALG).encode()?;
        let signature = self.sign(&signing_input(&header_b64, &verify_data))?;
        proof.jws = Some(detached_jws(&header_b64, &signature));

        tracing::debug!(
            verification_method = %proof.verification_method,
            created = %proof.created,
            "created linked-data proof"
        );
        Ok(proof)
    }

    /// Check the proof embedded in `document` against `key`.
    fn verify_proof(
        &self,
        document: &Value,
        key: &EcdsaSecp256k1VerificationKey2019,
    ) -> Result<(), LdpError> {
        let proof_value = document
            .as_object()
            .ok_or(LdpError::InvalidDocument)?
            .get("proof")
            .ok_or(LdpError::MissingProof)?;
        let proof: LinkedDataProof = serde_json::from_value(proof_value.clone())?;

        if proof.proof_type != Self::TYPE_NAME {
            return Err(LdpError::UnsupportedProofType {
                expected: Self::TYPE_NAME,
                found: proof.proof_type,
            });
        }
        if key.key_type != Self::REQUIRED_KEY_TYPE {
            return Err(LdpError::KeyTypeMismatch {
                expected: Self::REQUIRED_KEY_TYPE,
                found: key.key_type.clone(),
            });
        }
        if proof.verification_method != key.id {
            return Err(LdpError::VerificationMethodMismatch {
                proof: proof.verification_method,
                key: key.id.clone(),
            });
        }

        let jws = proof
            .jws
            .as_deref()
            .ok_or_else(|| LdpError::InvalidJws("proof has no jws".into()))?;
        let (header_b64, header, signature) = split_detached_jws(jws)?;
        if header.alg != Self::ALG {
            return Err(LdpError::UnsupportedAlgorithm(header.alg));
        }
        if header.b64 || !header.crit.iter().any(|c| c == "b64") {
            return Err(LdpError::InvalidJws("payload must be unencoded".into()));
        }

        let verify_data = create_verify_data(document, &proof)?;
        let digest = sha256(&signing_input(header_b64, &verify_data));
        key.public_key()?.verify_prehash_der(&digest, &signature)?;

        tracing::debug!(verification_method = %key.id, "verified linked-data proof");
        Ok(())
    }
}

/// SHA-256 of the canonical proof options followed by SHA-256 of the
/// canonical document without its proof.
pub fn create_verify_data(document: &Value, proof: &LinkedDataProof) -> Result<Vec<u8>, LdpError> {
    let mut unsigned = document
        .as_object()
        .ok_or(LdpError::InvalidDocument)?
        .clone();
    unsigned.remove("proof");

    let options = serde_jcs::to_vec(&proof.options())?;
    let document = serde_jcs::to_vec(&unsigned)?;

    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&sha256(&options));
    data.extend_from_slice(&sha256(&document));
    Ok(data)
}
