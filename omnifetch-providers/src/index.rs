use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use omnifetch_core::Value;

use crate::HashEmbedder;

/// File name of the persisted index inside the index directory.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index encoding error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("document '{0}' has empty content")]
    EmptyContent(String),
}

/// One indexed chunk: content plus its precomputed embedding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub content: String,
    pub source: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub embedding: Vec<f32>,
}

/// On-disk index format consumed by the `local_index` backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedIndex {
    pub dimension: usize,
    pub entries: Vec<IndexEntry>,
}

impl PersistedIndex {
    pub async fn load(dir: &Path) -> Result<Self, IndexError> {
        let path = dir.join(INDEX_FILE);
        let raw = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn persist(&self, dir: &Path) -> Result<(), IndexError> {
        tokio::fs::create_dir_all(dir).await?;
        let raw = serde_json::to_string(self)?;
        tokio::fs::write(dir.join(INDEX_FILE), raw).await?;
        Ok(())
    }
}

/// Offline builder producing the persisted index.
///
/// Embeds documents with the hash embedder as they are added; `persist`
/// writes the result where the `local_index` backend expects it.
#[derive(Debug)]
pub struct IndexBuilder {
    embedder: HashEmbedder,
    entries: Vec<IndexEntry>,
}

impl IndexBuilder {
    pub fn new(dimension: usize) -> Self {
        Self {
            embedder: HashEmbedder::new(dimension),
            entries: Vec::new(),
        }
    }

    pub fn add_document(
        &mut self,
        id: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<&mut Self, IndexError> {
        let id = id.into();
        let content = content.into();
        if content.trim().is_empty() {
            return Err(IndexError::EmptyContent(id));
        }
        let embedding = self.embedder.embed(&content);
        self.entries.push(IndexEntry {
            id,
            content,
            source: source.into(),
            metadata: HashMap::new(),
            embedding,
        });
        Ok(self)
    }

    /// Read a UTF-8 text file and index it paragraph by paragraph, so one
    /// file yields several independently scored chunks.
    pub async fn add_text_file(&mut self, path: &Path) -> Result<&mut Self, IndexError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        for (position, paragraph) in split_paragraphs(&raw).into_iter().enumerate() {
            let id = format!("{source}#{position}");
            self.add_document(id, paragraph, source.clone())?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> PersistedIndex {
        PersistedIndex {
            dimension: self.embedder.dimension(),
            entries: self.entries,
        }
    }

    pub async fn persist(self, dir: &Path) -> Result<(), IndexError> {
        self.build().persist(dir).await
    }
}

fn split_paragraphs(raw: &str) -> Vec<String> {
    raw.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}
