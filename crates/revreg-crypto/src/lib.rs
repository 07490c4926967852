pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use hashing::{hash, sha256, Hash};
pub use keys::{Ed25519KeyPair, KeyPair, PublicKey, Secp256k1KeyPair};
pub use signing::{verify, DidSigner, SignatureAlgorithm};
