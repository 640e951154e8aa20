//! Umbrella crate: uniform retrieval dispatch over heterogeneous providers.
//!
//! Re-exports the core contract and, with the default `providers` feature,
//! the six bundled backends.

pub use omnifetch_core::*;

#[cfg(feature = "providers")]
pub use omnifetch_providers as providers;

#[cfg(feature = "providers")]
pub use omnifetch_providers::{default_manager, Settings};
