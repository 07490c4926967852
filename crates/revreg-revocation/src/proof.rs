use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use revreg_core::{Did, Policy};
use revreg_crypto::{DidSigner, PublicKey};

use crate::error::RevocationError;
use crate::operation::ProofEntry;

/// Caller-held map from controller DID to a local signing capability.
///
/// Never transmitted; only the signatures derived from it leave the process.
/// The proof builder only reads it, so one map can serve many operations.
#[derive(Clone, Default)]
pub struct DidKeys {
    keys: HashMap<Did, Arc<dyn DidSigner>>,
}

impl DidKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `did` with a signer, returning the previous one.
    pub fn insert(
        &mut self,
        did: Did,
        signer: impl DidSigner + 'static,
    ) -> Option<Arc<dyn DidSigner>> {
        self.keys.insert(did, Arc::new(signer))
    }

    pub fn get(&self, did: &Did) -> Option<&Arc<dyn DidSigner>> {
        self.keys.get(did)
    }

    pub fn remove(&mut self, did: &Did) -> Option<Arc<dyn DidSigner>> {
        self.keys.remove(did)
    }

    pub fn contains(&self, did: &Did) -> bool {
        self.keys.contains_key(did)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for DidKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dids: Vec<&Did> = self.keys.keys().collect();
        dids.sort();
        f.debug_struct("DidKeys").field("dids", &dids).finish()
    }
}

/// Sign `message` once per policy controller.
///
/// Controllers are sorted by ascending byte order before signing, and every
/// key is looked up before the first signature is produced, so a missing key
/// fails without any partial proof.
pub fn build_proof(
    policy: &Policy,
    message: &[u8],
    keys: &DidKeys,
) -> Result<Vec<ProofEntry>, RevocationError> {
    let mut controllers: Vec<Did> = policy.controllers().iter().copied().collect();
    if controllers.is_empty() {
        return Err(RevocationError::EmptyControllerSet);
    }
    controllers.sort_unstable();
    controllers.dedup();

    let signers = controllers
        .into_iter()
        .map(|did| {
            keys.get(&did)
                .map(|signer| (did, Arc::clone(signer)))
                .ok_or(RevocationError::MissingSignerKey(did))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut proof = Vec::with_capacity(signers.len());
    for (controller, signer) in signers {
        let signature = signer.sign(message)?;
        proof.push(ProofEntry {
            controller,
            algorithm: signer.algorithm(),
            signature,
        });
    }

    tracing::debug!(signatures = proof.len(), "built operation proof");
    Ok(proof)
}

/// Ledger-side proof check.
///
/// Entries must be strictly ascending by controller, each signer must have a
/// registered key of the tagged algorithm, and each signature must verify
/// over `message`. The resulting signer set must then satisfy `policy`.
pub fn verify_proof(
    policy: &Policy,
    message: &[u8],
    proof: &[ProofEntry],
    lookup_key: impl Fn(&Did) -> Option<PublicKey>,
) -> Result<(), RevocationError> {
    let ordered = proof
        .windows(2)
        .all(|pair| pair[0].controller < pair[1].controller);
    if !ordered {
        return Err(RevocationError::ProofNotSatisfying(
            "signatures not in ascending controller order".into(),
        ));
    }

    let mut signers = BTreeSet::new();
    for entry in proof {
        let key = lookup_key(&entry.controller).ok_or_else(|| {
            RevocationError::ProofNotSatisfying(format!(
                "controller {} has no registered key",
                entry.controller
            ))
        })?;
        revreg_crypto::verify(entry.algorithm, message, &entry.signature, &key).map_err(|e| {
            RevocationError::ProofNotSatisfying(format!(
                "signature of {} rejected: {}",
                entry.controller, e
            ))
        })?;
        signers.insert(entry.controller);
    }

    if policy.is_satisfied_by(&signers) {
        Ok(())
    } else {
        let missing = policy.controllers().difference(&signers).count();
        let extra = signers.difference(policy.controllers()).count();
        Err(RevocationError::ProofNotSatisfying(format!(
            "{} controller signature(s) missing, {} unexpected",
            missing, extra
        )))
    }
}
