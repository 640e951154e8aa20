use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{Params, RetrievalResult, RetrieveError, Retriever};

/// Provider used by [`RetrievalManager::retrieve_finance`] when neither an
/// explicit argument nor a configured default names one.
pub const FALLBACK_FINANCE_PROVIDER: &str = "finance_yahoo";

/// One retrieval call inside a [`RetrievalManager::retrieve_batch`] request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub retriever: String,
    pub query: String,
    #[serde(default)]
    pub params: Params,
}

impl RetrievalRequest {
    pub fn new(retriever: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            retriever: retriever.into(),
            query: query.into(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// Per-slot outcome of fan-out and batch dispatch: either a full result or
/// the captured error for that provider, never a panic escaping the layer.
pub type Outcome = Result<RetrievalResult, RetrieveError>;

/// Owns the name-to-backend registry and exposes the only entry points a
/// caller may use: single-call, finance convenience, fan-out and batch
/// dispatch. The registry is read-only during dispatch; mutation happens
/// solely through [`register`](Self::register) and
/// [`unregister`](Self::unregister).
#[derive(Default)]
pub struct RetrievalManager {
    retrievers: HashMap<String, Arc<dyn Retriever>>,
    default_finance_provider: Option<String>,
}

impl RetrievalManager {
    /// Manager with an empty registry and no configured finance default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager whose finance convenience calls resolve to `provider` when
    /// the caller does not name one explicitly.
    pub fn with_default_finance_provider(provider: impl Into<String>) -> Self {
        Self {
            retrievers: HashMap::new(),
            default_finance_provider: Some(provider.into()),
        }
    }

    /// Insert or replace the entry for `retriever.name()`; last write wins,
    /// taking effect on the next call.
    pub fn register(&mut self, retriever: Arc<dyn Retriever>) {
        let name = retriever.name().to_string();
        if self.retrievers.insert(name.clone(), retriever).is_some() {
            tracing::debug!(name = %name, "replaced registered retriever");
        }
    }

    /// Remove an entry if present. Missing names are a silent no-op; the
    /// return value reports whether anything was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.retrievers.remove(name).is_some()
    }

    /// Currently registered canonical names, sorted for stable output.
    pub fn list_retrievers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.retrievers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_retriever(&self, name: &str) -> bool {
        self.retrievers.contains_key(name)
    }

    pub fn get_retriever(&self, name: &str) -> Option<Arc<dyn Retriever>> {
        self.retrievers.get(name).cloned()
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn Retriever>, RetrieveError> {
        self.retrievers.get(name).cloned().ok_or_else(|| {
            let available = self.list_retrievers();
            let available = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            RetrieveError::NotFound {
                name: name.to_string(),
                available,
            }
        })
    }

    /// Dispatch one query to the named backend. Fails with `NotFound` before
    /// any backend is touched; otherwise the backend's result is returned
    /// unmodified.
    pub async fn retrieve(
        &self,
        name: &str,
        query: &str,
        params: Params,
    ) -> Result<RetrievalResult, RetrieveError> {
        let retriever = self.lookup(name)?;
        retriever.retrieve(query, params).await
    }

    /// Financial lookup over the two interchangeable quote backends.
    ///
    /// Resolution order: explicit `provider` argument, else the default
    /// configured at construction, else [`FALLBACK_FINANCE_PROVIDER`]. This
    /// is the one place provider selection lives outside the generic path.
    pub async fn retrieve_finance(
        &self,
        symbol: &str,
        provider: Option<&str>,
        params: Params,
    ) -> Result<RetrievalResult, RetrieveError> {
        let name = provider
            .or(self.default_finance_provider.as_deref())
            .unwrap_or(FALLBACK_FINANCE_PROVIDER);
        self.retrieve(name, symbol, params).await
    }

    /// Fan one query out to several providers (all registered ones when
    /// `retrievers` is `None`), optionally customizing parameters per
    /// provider via `kwargs_map`.
    ///
    /// The returned map holds exactly one entry per requested name; a
    /// failing provider appears as a captured-error outcome and never
    /// aborts its siblings.
    pub async fn retrieve_all(
        &self,
        query: &str,
        retrievers: Option<&[&str]>,
        kwargs_map: Option<&HashMap<String, Params>>,
    ) -> HashMap<String, Outcome> {
        let names: Vec<String> = match retrievers {
            Some(names) => names.iter().map(|name| name.to_string()).collect(),
            None => self.list_retrievers(),
        };

        let calls = names.into_iter().map(|name| {
            let params = kwargs_map
                .and_then(|map| map.get(&name).cloned())
                .unwrap_or_default();
            async move {
                let outcome = self.retrieve(&name, query, params).await;
                (name, outcome)
            }
        });

        join_all(calls).await.into_iter().collect()
    }

    /// Execute independent `(provider, query, params)` requests and return
    /// outcomes positionally aligned with the input, regardless of which
    /// requests fail or how long each takes.
    pub async fn retrieve_batch(&self, requests: Vec<RetrievalRequest>) -> Vec<Outcome> {
        let calls = requests.into_iter().map(|request| async move {
            self.retrieve(&request.retriever, &request.query, request.params)
                .await
        });
        join_all(calls).await
    }
}
