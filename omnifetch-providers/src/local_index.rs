use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever};

use crate::index::PersistedIndex;
use crate::{HashEmbedder, Settings};

pub const LOCAL_INDEX: &str = "local_index";

/// Semantic retriever over the persisted on-disk index.
///
/// The index is produced offline by [`crate::IndexBuilder`]; this backend
/// only loads it. Loading happens lazily and exactly once, guarded by a
/// `OnceCell` so concurrent first calls do not race to initialize twice.
pub struct LocalIndexRetriever {
    persist_dir: PathBuf,
    index: OnceCell<PersistedIndex>,
}

impl LocalIndexRetriever {
    pub fn new(settings: &Settings) -> Self {
        Self {
            persist_dir: settings.index_dir.clone(),
            index: OnceCell::new(),
        }
    }

    pub fn with_persist_dir(persist_dir: impl Into<PathBuf>) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            index: OnceCell::new(),
        }
    }

    pub fn persist_dir(&self) -> &PathBuf {
        &self.persist_dir
    }

    async fn index(&self) -> Result<&PersistedIndex, RetrieveError> {
        self.index
            .get_or_try_init(|| async {
                if !self.persist_dir.is_dir() {
                    return Err(RetrieveError::provider(
                        LOCAL_INDEX,
                        format!(
                            "index not found at '{}'; build and persist it first",
                            self.persist_dir.display()
                        ),
                    ));
                }
                PersistedIndex::load(&self.persist_dir)
                    .await
                    .map_err(|err| RetrieveError::provider(LOCAL_INDEX, err))
            })
            .await
    }
}

#[async_trait]
impl Retriever for LocalIndexRetriever {
    fn name(&self) -> &str {
        LOCAL_INDEX
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let index = self.index().await?;
        let top_k = params.top_k()?;

        let query_embedding = HashEmbedder::new(index.dimension).embed(query);

        let mut scored: Vec<(f32, &crate::index::IndexEntry)> = index
            .entries
            .iter()
            .map(|entry| {
                let mut score = cosine_similarity(&query_embedding, &entry.embedding);
                if score.is_nan() {
                    score = f32::NEG_INFINITY;
                }
                (score, entry)
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let documents = scored
            .into_iter()
            .map(|(score, entry)| RetrievedDocument {
                content: entry.content.clone(),
                source: entry.source.clone(),
                score: f64::from(score),
                metadata: entry.metadata.clone(),
            })
            .collect();

        Ok(Fetched::new(documents)
            .with_metadata("persist_dir", self.persist_dir.display().to_string()))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
