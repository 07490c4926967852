use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::codec::{put_len, Reader};
use crate::error::CoreError;
use crate::types::Did;

/// Who may change a revocation registry.
///
/// The ledger names the only variant `OneOf`, but it authorizes a change
/// only when *every* controller has signed it. The name describes the policy
/// kind, not a threshold, and is kept for wire compatibility.
///
/// Build values through [`Policy::one_of`] or deserialization; both reject an
/// empty controller set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicyRepr", into = "PolicyRepr")]
pub enum Policy {
    OneOf { controllers: BTreeSet<Did> },
}

/// Unvalidated serde shape of [`Policy`].
#[derive(Serialize, Deserialize)]
enum PolicyRepr {
    OneOf { controllers: BTreeSet<Did> },
}

impl TryFrom<PolicyRepr> for Policy {
    type Error = CoreError;

    fn try_from(repr: PolicyRepr) -> Result<Self, Self::Error> {
        match repr {
            PolicyRepr::OneOf { controllers } => Policy::one_of(controllers),
        }
    }
}

impl From<Policy> for PolicyRepr {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::OneOf { controllers } => PolicyRepr::OneOf { controllers },
        }
    }
}

const TAG_ONE_OF: u8 = 0;

impl Policy {
    /// Create a `OneOf` policy over a non-empty controller set.
    pub fn one_of(controllers: impl IntoIterator<Item = Did>) -> Result<Self, CoreError> {
        let controllers: BTreeSet<Did> = controllers.into_iter().collect();
        let policy = Policy::OneOf { controllers };
        policy.validate()?;
        Ok(policy)
    }

    /// Controllers named by the policy, ascending.
    pub fn controllers(&self) -> &BTreeSet<Did> {
        match self {
            Policy::OneOf { controllers } => controllers,
        }
    }

    /// Re-check the construction invariant on a value that may have been
    /// built directly from the public variant.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Policy::OneOf { controllers } if controllers.is_empty() => Err(
                CoreError::InvalidPolicy("OneOf policy needs at least one controller".into()),
            ),
            Policy::OneOf { .. } => Ok(()),
        }
    }

    /// True iff `signers` is exactly the controller set.
    pub fn is_satisfied_by(&self, signers: &BTreeSet<Did>) -> bool {
        match self {
            Policy::OneOf { controllers } => !controllers.is_empty() && signers == controllers,
        }
    }

    /// Canonical encoding: variant tag, controller count, controllers ascending.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }

    pub(crate) fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            Policy::OneOf { controllers } => {
                out.push(TAG_ONE_OF);
                put_len(out, controllers.len());
                for did in controllers {
                    out.extend_from_slice(did.as_bytes());
                }
            }
        }
    }

    pub(crate) fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CoreError> {
        match reader.read_u8()? {
            TAG_ONE_OF => {
                let count = reader.read_u32()?;
                let mut controllers = BTreeSet::new();
                let mut previous: Option<Did> = None;
                for _ in 0..count {
                    let did = Did::new(reader.read_id()?);
                    if previous.is_some_and(|p| p >= did) {
                        return Err(CoreError::Decoding(
                            "policy controllers not in ascending order".into(),
                        ));
                    }
                    previous = Some(did);
                    controllers.insert(did);
                }
                Policy::one_of(controllers)
            }
            tag => Err(CoreError::Decoding(format!("unknown policy tag {}", tag))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn did(b: u8) -> Did {
        Did::new([b; 32])
    }

    #[test]
    fn test_empty_policy_rejected() {
        let result = Policy::one_of(Vec::new());
        assert!(matches!(result, Err(CoreError::InvalidPolicy(_))));
    }

    #[test]
    fn test_validate_catches_direct_construction() {
        let policy = Policy::OneOf {
            controllers: BTreeSet::new(),
        };
        assert!(policy.validate().is_err());
        assert!(!policy.is_satisfied_by(&BTreeSet::new()));
    }

    #[test]
    fn test_satisfied_only_by_exact_set() {
        let policy = Policy::one_of([did(1), did(2)]).unwrap();

        let exact: BTreeSet<Did> = [did(2), did(1)].into_iter().collect();
        assert!(policy.is_satisfied_by(&exact));

        let subset: BTreeSet<Did> = [did(1)].into_iter().collect();
        assert!(!policy.is_satisfied_by(&subset));

        let superset: BTreeSet<Did> = [did(1), did(2), did(3)].into_iter().collect();
        assert!(!policy.is_satisfied_by(&superset));

        let disjoint: BTreeSet<Did> = [did(3)].into_iter().collect();
        assert!(!policy.is_satisfied_by(&disjoint));

        assert!(!policy.is_satisfied_by(&BTreeSet::new()));
    }

    #[test]
    fn test_single_controller_satisfaction() {
        let policy = Policy::one_of([did(9)]).unwrap();
        let signers: BTreeSet<Did> = [did(9)].into_iter().collect();
        assert!(policy.is_satisfied_by(&signers));
    }

    #[test]
    fn test_controllers_sorted_regardless_of_input_order() {
        let policy = Policy::one_of([did(3), did(1), did(2)]).unwrap();
        let order: Vec<Did> = policy.controllers().iter().copied().collect();
        assert_eq!(order, vec![did(1), did(2), did(3)]);
    }

    #[test]
    fn test_bytes_layout() {
        let policy = Policy::one_of([did(2), did(1)]).unwrap();
        let bytes = policy.to_bytes();
        assert_eq!(bytes.len(), 1 + 4 + 64);
        assert_eq!(bytes[0], TAG_ONE_OF);
        assert_eq!(&bytes[1..5], &2u32.to_le_bytes());
        assert_eq!(&bytes[5..37], &[1u8; 32]);
        assert_eq!(&bytes[37..69], &[2u8; 32]);
    }

    #[test]
    fn test_json_shape() {
        let policy = Policy::one_of([did(1)]).unwrap();
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "OneOf": { "controllers": [did(1).to_hex()] } })
        );
    }

    #[test]
    fn test_json_empty_controllers_rejected() {
        let result: Result<Policy, _> =
            serde_json::from_str(r#"{"OneOf":{"controllers":[]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut reader = Reader::new(&[7]);
        assert!(Policy::decode_from(&mut reader).is_err());
    }

    #[test]
    fn test_decode_rejects_unsorted_controllers() {
        let mut bytes = vec![TAG_ONE_OF];
        put_len(&mut bytes, 2);
        bytes.extend_from_slice(&[2u8; 32]);
        bytes.extend_from_slice(&[1u8; 32]);
        let mut reader = Reader::new(&bytes);
        assert!(Policy::decode_from(&mut reader).is_err());
    }
}
