//! Error taxonomy for bootstrap runs and network backends.
//!
//! Every variant aborts the run that produced it; nothing here is retried.
use std::fmt;
use thiserror::Error;

/// Artifact kinds provisioned by a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Account,
    Topic,
    Token,
}

impl ArtifactKind {
    /// Return the stable lowercase name used in errors, logs, and node ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Account => "account",
            ArtifactKind::Topic => "topic",
            ArtifactKind::Token => "token",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the orchestrator and the network backends.
#[derive(Debug, Error)]
pub enum HederaError {
    /// Malformed or incomplete input, detected before any side effect.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A treasury alias that no account in the current run carries.
    #[error("treasury alias {alias:?} not found")]
    UnresolvedAlias { alias: String },

    /// Opaque failure from the underlying network.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A create call failed; names the artifact that was being created.
    #[error("create {kind} {alias:?}: {source}")]
    Create {
        kind: ArtifactKind,
        alias: String,
        #[source]
        source: Box<HederaError>,
    },
}

impl HederaError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        HederaError::Validation(message.into())
    }

    pub(crate) fn backend(message: impl Into<String>) -> Self {
        HederaError::Backend(message.into())
    }

    pub(crate) fn creating(kind: ArtifactKind, alias: &str, source: HederaError) -> Self {
        HederaError::Create {
            kind,
            alias: alias.to_string(),
            source: Box::new(source),
        }
    }

    /// Return the innermost error, unwrapping `Create` layers.
    #[cfg(test)]
    pub fn root(&self) -> &HederaError {
        match self {
            HederaError::Create { source, .. } => source.root(),
            other => other,
        }
    }
}
