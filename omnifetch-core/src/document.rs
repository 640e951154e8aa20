use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Value;

/// One retrieved unit returned by a backend.
///
/// `score` semantics are provider-defined (cosine similarity for the local
/// index, rank-derived confidence for API hits) and are only comparable
/// within a single provider's result set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    pub content: String,
    /// Origin identifier: file name for local index hits, provider name for
    /// API hits.
    pub source: String,
    pub score: f64,
    /// Provider-specific raw fields (URLs, document ids, payload fragments).
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f64) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The outcome of one dispatch to one provider.
///
/// `documents` preserves the provider's own ranking order end-to-end; an
/// empty list is a valid zero-result outcome, not an error. `latency` is
/// measured by the contract layer strictly around the backend fetch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    /// The normalized query actually sent to the backend, never the raw
    /// caller-supplied string.
    pub query: String,
    pub documents: Vec<RetrievedDocument>,
    /// Canonical name of the retriever that produced the result.
    pub provider: String,
    pub latency: Duration,
    /// Request-level context (requested location, persist dir, ...),
    /// distinct from per-document metadata.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}
