//! Integration test: signing and verifying a credential with the
//! EcdsaSecp256k1Signature2019 suite.

use revreg_crypto::Secp256k1KeyPair;
use revreg_ldp::{
    EcdsaSecp256k1Signature2019, EcdsaSecp256k1VerificationKey2019, LdpError,
    LinkedDataSignatureSuite, ProofPurpose,
};

const ISSUER: &str = "did:example:issuer";
const KEY_ID: &str = "did:example:issuer#keys-1";

fn credential(subject: &str) -> serde_json::Value {
    serde_json::json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://www.w3.org/2018/credentials/examples/v1"
        ],
        "id": "https://example.com/credentials/1872",
        "type": ["VerifiableCredential", "AlumniCredential"],
        "issuer": ISSUER,
        "issuanceDate": "2026-01-01T19:23:24Z",
        "credentialSubject": { "id": subject, "alumniOf": "Example University" }
    })
}

#[test]
fn test_issue_and_verify_credential() {
    let kp = Secp256k1KeyPair::generate();
    let key = EcdsaSecp256k1VerificationKey2019::from_keypair(KEY_ID, ISSUER, &kp);
    let suite = EcdsaSecp256k1Signature2019::new(kp, KEY_ID);

    let signed = suite
        .sign_document(&credential("did:example:holder"), ProofPurpose::AssertionMethod)
        .expect("signing should succeed");
    assert_eq!(signed["proof"]["verificationMethod"], KEY_ID);

    // key travels as JSON, e.g. inside a DID document
    let key_json = serde_json::to_string(&key).unwrap();
    let resolved: EcdsaSecp256k1VerificationKey2019 = serde_json::from_str(&key_json).unwrap();

    EcdsaSecp256k1Signature2019::verifier()
        .verify_proof(&signed, &resolved)
        .expect("verification should succeed");
}

#[test]
fn test_other_issuer_key_rejected() {
    let kp = Secp256k1KeyPair::generate();
    let suite = EcdsaSecp256k1Signature2019::new(kp, KEY_ID);
    let signed = suite
        .sign_document(&credential("did:example:holder"), ProofPurpose::AssertionMethod)
        .unwrap();

    let impostor = EcdsaSecp256k1VerificationKey2019::from_keypair(
        KEY_ID,
        ISSUER,
        &Secp256k1KeyPair::generate(),
    );
    assert!(matches!(
        EcdsaSecp256k1Signature2019::verifier().verify_proof(&signed, &impostor),
        Err(LdpError::Crypto(_))
    ));
}

#[test]
fn test_proof_moved_to_other_subject_fails() {
    let kp = Secp256k1KeyPair::generate();
    let key = EcdsaSecp256k1VerificationKey2019::from_keypair(KEY_ID, ISSUER, &kp);
    let suite = EcdsaSecp256k1Signature2019::new(kp, KEY_ID);

    let signed = suite
        .sign_document(&credential("did:example:alice"), ProofPurpose::AssertionMethod)
        .unwrap();
    let mut forged = credential("did:example:mallory");
    forged["proof"] = signed["proof"].clone();

    assert!(suite.verify_proof(&forged, &key).is_err());
}
