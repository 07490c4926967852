use serde::{Deserialize, Serialize};

use crate::codec::Reader;
use crate::error::CoreError;
use crate::policy::Policy;
use crate::types::Nonce;

/// Authorization and mode record of one revocation registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Who is allowed to update this registry.
    pub policy: Policy,
    /// true: credentials can be revoked, but not un-revoked.
    /// false: credentials can be revoked and un-revoked.
    pub add_only: bool,
}

impl Registry {
    pub fn new(policy: Policy, add_only: bool) -> Self {
        Self { policy, add_only }
    }

    /// Canonical encoding: policy bytes followed by the add-only flag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.policy.encode_to(&mut out);
        out.push(u8::from(self.add_only));
        out
    }

    /// Exact inverse of [`Registry::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut reader = Reader::new(bytes);
        let policy = Policy::decode_from(&mut reader)?;
        let add_only = reader.read_bool()?;
        reader.finish()?;
        Ok(Self { policy, add_only })
    }

    /// JSON wire form `{ "policy": {..}, "add_only": bool }`.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A registry together with the ledger's current modification counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDetail {
    pub registry: Registry,
    pub last_modified: Nonce,
}
