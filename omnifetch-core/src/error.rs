use std::error::Error as StdError;

use thiserror::Error;

/// Failure taxonomy shared by the contract layer and every backend.
///
/// Single-provider calls propagate these unmodified; fan-out and batch
/// dispatch capture them into the corresponding result slot instead.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Caller-supplied arguments violate the contract (empty query,
    /// non-positive bound, missing required backend argument).
    #[error("invalid request: {0}")]
    Validation(String),
    /// The requested provider name is not registered with the manager.
    #[error("retriever '{name}' is not registered (available: {available})")]
    NotFound { name: String, available: String },
    /// Required credentials or configuration are absent; the backend did not
    /// attempt the call.
    #[error("missing configuration: {0}")]
    Configuration(String),
    /// The backend reached its external dependency but it failed. Preserves
    /// the originating cause for diagnostics.
    #[error("provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl RetrieveError {
    pub fn validation(message: impl Into<String>) -> Self {
        RetrieveError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        RetrieveError::Configuration(message.into())
    }

    pub fn provider(
        provider: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        RetrieveError::Provider {
            provider: provider.into(),
            source: source.into(),
        }
    }

    /// Name of the provider this error originated from, when one is known.
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            RetrieveError::NotFound { name, .. } => Some(name),
            RetrieveError::Provider { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
