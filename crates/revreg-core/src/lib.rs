//! Revreg Core: identity references, registry policies, the registry
//! lifecycle state machine, and client configuration.

pub mod codec;
pub mod config;
pub mod error;
pub mod policy;
pub mod registry;
pub mod registry_state;
pub mod telemetry;
pub mod types;

pub use config::{ClientConfig, KeyringConfig, LoggingConfig, NodeConfig};
pub use error::CoreError;
pub use policy::Policy;
pub use registry::{Registry, RegistryDetail};
pub use registry_state::{RegistryEvent, RegistryState, RegistryStateMachine, TransitionRejection};
pub use types::{Did, Nonce, RegistryId, RevokeId, ID_LEN};
