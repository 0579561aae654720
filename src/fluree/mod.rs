//! Fluree Cloud API access.
//!
//! The graph-database side of the pipeline: configuration, the typed
//! transaction document that bootstrap runs project into, and a blocking HTTP
//! client for the transact, dataset, and generation endpoints.
mod client;
mod config;

pub use client::{
    CreateDatasetRequest, FlureeClient, PromptEndpoint, PromptRequest, TransactionRequest,
    Transactor,
};
pub use config::FlureeConfig;

use thiserror::Error;

/// Failures talking to Fluree.
#[derive(Debug, Error)]
pub enum FlureeError {
    #[error("invalid Fluree configuration: {0}")]
    Config(String),

    /// Caller input rejected before any request was sent.
    #[error("fluree: {0}")]
    InvalidRequest(String),

    /// Fluree answered with an HTTP error status.
    #[error("fluree: {message} (status {status})")]
    Api { status: u16, message: String },

    #[error("fluree: perform request: {0}")]
    Transport(String),

    #[error("fluree: encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
