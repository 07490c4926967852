//! Revreg Revocation: signed registry operations, proof building and
//! checking, ledger interfaces, and the registry client.

pub mod adapters;
pub mod builder;
pub mod client;
pub mod error;
pub mod keyring;
pub mod ledger;
pub mod operation;
pub mod proof;

pub use adapters::InMemoryLedger;
pub use builder::OperationBuilder;
pub use client::RegistryClient;
pub use error::RevocationError;
pub use keyring::account_keypair;
pub use ledger::{LedgerTransport, StateReader, TransactionReceipt};
pub use operation::{
    check_payload, encode_message, OperationKind, OperationPayload, ProofEntry,
    RevocationSetOperation,
};
pub use proof::{build_proof, verify_proof, DidKeys};
