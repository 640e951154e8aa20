use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;

use crate::{Params, RetrievalResult, RetrieveError, RetrievedDocument, Value};

/// What a backend fetch step hands back: ordered documents plus
/// result-level metadata.
#[derive(Debug, Default)]
pub struct Fetched {
    pub documents: Vec<RetrievedDocument>,
    pub metadata: HashMap<String, Value>,
}

impl Fetched {
    pub fn new(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Trim the query and collapse internal whitespace runs to single spaces.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Contract every retrieval backend must satisfy.
///
/// Backends implement [`name`](Retriever::name) and the backend-specific
/// [`fetch`](Retriever::fetch) step; callers go through the provided
/// [`retrieve`](Retriever::retrieve) entry point, which layers query
/// normalization, parameter validation, latency measurement and result
/// assembly on top of every backend uniformly. Provider-specific knobs flow
/// through the [`Params`] bag, never through new trait methods.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Canonical provider name this backend is registered under.
    fn name(&self) -> &str;

    /// Backend-specific retrieval. `query` is already normalized; do not
    /// call this directly, go through [`retrieve`](Retriever::retrieve).
    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError>;

    /// Shared public entry point: validate, normalize, time the fetch and
    /// wrap its output into a [`RetrievalResult`].
    async fn retrieve(
        &self,
        query: &str,
        params: Params,
    ) -> Result<RetrievalResult, RetrieveError> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Err(RetrieveError::validation("query must be a non-empty string"));
        }
        let top_k = params.top_k()?;

        // Only the backend fetch is timed, not validation or normalization.
        let start = Instant::now();
        let fetched = self.fetch(&query, &params).await?;
        let latency = start.elapsed();

        let Fetched {
            mut documents,
            metadata,
        } = fetched;
        documents.truncate(top_k);

        tracing::debug!(
            provider = self.name(),
            documents = documents.len(),
            latency_ms = latency.as_millis() as u64,
            "retrieve completed"
        );

        Ok(RetrievalResult {
            query,
            documents,
            provider: self.name().to_string(),
            latency,
            metadata,
        })
    }
}
