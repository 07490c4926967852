use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Byte length of every on-ledger identifier (DIDs, registry ids, revoke ids).
pub const ID_LEN: usize = 32;

macro_rules! byte_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; ID_LEN]);

        impl $name {
            /// Wrap an already sized byte array.
            pub const fn new(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Create from a byte slice, rejecting anything that is not exactly 32 bytes.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
                let arr: [u8; ID_LEN] =
                    bytes
                        .try_into()
                        .map_err(|_| CoreError::InvalidIdentifier {
                            kind: $kind,
                            reason: format!("expected {} bytes, got {}", ID_LEN, bytes.len()),
                        })?;
                Ok(Self(arr))
            }

            /// Decode from hex, with or without a `0x` prefix.
            pub fn from_hex(hex_str: &str) -> Result<Self, CoreError> {
                let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                let bytes = hex::decode(stripped).map_err(|e| CoreError::InvalidIdentifier {
                    kind: $kind,
                    reason: format!("invalid hex: {}", e),
                })?;
                Self::from_bytes(&bytes)
            }

            /// Generate a random identifier.
            pub fn random() -> Self {
                Self(rand::random())
            }

            /// Raw bytes.
            pub fn as_bytes(&self) -> &[u8; ID_LEN] {
                &self.0
            }

            /// `0x`-prefixed lowercase hex.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_hex(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_hex()
            }
        }
    };
}

byte_identifier!(
    /// Decentralized Identifier as stored on the ledger: a 32-byte identity
    /// reference. Ordering is plain byte order, which is the order proofs are
    /// built and verified in.
    Did,
    "DID"
);

byte_identifier!(
    /// Identifier of one revocation registry.
    RegistryId,
    "registry id"
);

byte_identifier!(
    /// Identifier of one revocable credential inside a registry.
    RevokeId,
    "revoke id"
);

/// Ledger-owned modification counter of a registry.
///
/// The client never produces one; it reads the current value and echoes it
/// back in the next state change.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Nonce(pub u64);

impl Nonce {
    /// The value observed for a registry that does not exist yet.
    pub const ZERO: Nonce = Nonce(0);

    /// Little-endian encoding used in signed messages.
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
