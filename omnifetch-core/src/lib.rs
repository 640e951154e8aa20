//! Core retrieval abstraction for omnifetch.
//!
//! This crate defines the uniform result contract ([`RetrievalResult`]), the
//! [`Retriever`] trait every backend implements, and the [`RetrievalManager`]
//! that dispatches single, fan-out and batch calls over registered backends.
//! Concrete providers live in `omnifetch-providers`.

mod document;
mod error;
mod manager;
mod params;
mod retriever;
mod value;

pub use document::{RetrievalResult, RetrievedDocument};
pub use error::RetrieveError;
pub use manager::{Outcome, RetrievalManager, RetrievalRequest, FALLBACK_FINANCE_PROVIDER};
pub use params::{Params, DEFAULT_TOP_K, MAX_TOP_K};
pub use retriever::{normalize_query, Fetched, Retriever};
pub use value::Value;
