#![allow(dead_code)]

use async_trait::async_trait;
use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever};

/// Deterministic backend returning a fixed set of documents.
pub struct StaticRetriever {
    name: String,
    documents: Vec<RetrievedDocument>,
}

impl StaticRetriever {
    pub fn new(name: &str, documents: Vec<RetrievedDocument>) -> Self {
        Self {
            name: name.to_string(),
            documents,
        }
    }

    /// Backend echoing `count` documents derived from the query.
    pub fn echo(name: &str, count: usize) -> EchoRetriever {
        EchoRetriever {
            name: name.to_string(),
            count,
        }
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _query: &str, _params: &Params) -> Result<Fetched, RetrieveError> {
        Ok(Fetched::new(self.documents.clone()).with_metadata("static", true))
    }
}

pub struct EchoRetriever {
    name: String,
    count: usize,
}

#[async_trait]
impl Retriever for EchoRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &str, _params: &Params) -> Result<Fetched, RetrieveError> {
        let documents = (0..self.count)
            .map(|i| RetrievedDocument::new(format!("{query}-{i}"), "echo", 1.0 / (i + 1) as f64))
            .collect::<Vec<_>>();
        let count = documents.len();
        Ok(Fetched::new(documents).with_metadata("count", count as u64))
    }
}

/// Backend that always fails with the configured error kind.
pub struct FailingRetriever {
    name: String,
    kind: FailureKind,
}

pub enum FailureKind {
    Configuration,
    Provider,
}

impl FailingRetriever {
    pub fn configuration(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FailureKind::Configuration,
        }
    }

    pub fn provider(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FailureKind::Provider,
        }
    }
}

#[async_trait]
impl Retriever for FailingRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _query: &str, _params: &Params) -> Result<Fetched, RetrieveError> {
        match self.kind {
            FailureKind::Configuration => Err(RetrieveError::configuration(format!(
                "{} has no API key",
                self.name
            ))),
            FailureKind::Provider => Err(RetrieveError::provider(
                self.name.clone(),
                "upstream returned HTTP 503",
            )),
        }
    }
}
