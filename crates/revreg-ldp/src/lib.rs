//! Revreg LDP: linked-data proofs for verifiable credentials signed with
//! secp256k1 keys.

pub mod error;
pub mod proof;
pub mod suite;
pub mod verification_key;

pub use error::LdpError;
pub use proof::{JwsHeader, LinkedDataProof, ProofPurpose};
pub use suite::{
    create_verify_data, EcdsaSecp256k1Signature2019, LinkedDataSignatureSuite, Secp256k1Signer,
};
pub use verification_key::EcdsaSecp256k1VerificationKey2019;
