//! Hedera bootstrap: declarative specs, network backends, and orchestration.
//!
//! A [`BootstrapSpec`] names accounts, topics, and tokens. A [`Bootstrapper`]
//! creates them against any [`Network`] (the in-memory [`MockNetwork`] or the
//! SDK-backed [`LiveNetwork`]) and returns a [`BootstrapResult`] that can
//! be projected into a Fluree transaction.
mod bootstrap;
mod config;
mod context;
mod error;
mod jsonld;
mod ledger;
mod live;
mod mock;
mod network;
mod records;
mod sdk;
mod spec;

pub use bootstrap::Bootstrapper;
pub use config::{HederaConfig, HederaOverrides};
pub use context::RunContext;
pub use error::{ArtifactKind, HederaError};
pub use live::LiveNetwork;
pub use mock::MockNetwork;
pub use network::Network;
pub use records::{AccountRecord, BootstrapResult, TokenRecord, TopicRecord};
pub use spec::{load_bootstrap_spec, AccountSpec, BootstrapSpec, TokenSpec, TopicSpec};
