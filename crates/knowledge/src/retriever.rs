//! Retriever: builds the vector index from chunks and serves top-k lookups.

use crate::embeddings::EmbeddingProvider;
use crate::index::FlatIndex;
use docchat_core::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;

/// One retrieval hit: a chunk and its distance from the question.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    /// Position of the chunk in the corpus chunk sequence
    pub position: usize,

    /// The chunk's text
    pub text: String,

    /// Squared L2 distance from the question embedding (smaller is closer)
    pub distance: f32,
}

/// Retrieval engine over one session's corpus.
///
/// Owns the chunk sequence and the index built over it. Questions are
/// embedded through the same provider as the chunks, so query and stored
/// vectors live in the same embedding space. The chunk sequence is never
/// reordered after construction; index positions map back to chunk texts
/// for the lifetime of the session.
pub struct Retriever {
    chunks: Vec<String>,
    index: FlatIndex,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Embed every chunk and bulk-load a fresh index.
    ///
    /// Rejects an empty chunk sequence before any provider call. A provider
    /// failure on any chunk aborts the whole build: a partial index is
    /// never exposed for querying.
    pub async fn build(
        chunks: Vec<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        if chunks.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        tracing::info!(
            "Embedding {} chunks with {} ({})",
            chunks.len(),
            embedder.provider_name(),
            embedder.model_name()
        );

        let embeddings = embedder.embed_batch(&chunks).await?;

        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let index = FlatIndex::build(embeddings)?;

        tracing::info!(
            "Retrieval index ready: {} chunks, {} dimensions",
            index.len(),
            index.dimensions()
        );

        Ok(Self {
            chunks,
            index,
            embedder,
        })
    }

    /// Retrieve the `k` chunks most similar to `question`.
    ///
    /// Returns at most `min(k, chunk count)` hits in ascending-distance
    /// order. The chunk text of each hit is looked up by the position the
    /// index reports.
    pub async fn retrieve(&self, question: &str, k: usize) -> AppResult<Vec<RetrievedChunk>> {
        let query = self.embedder.embed(question).await?;
        let hits = self.index.search(&query, k)?;

        Ok(hits
            .into_iter()
            .map(|(position, distance)| RetrievedChunk {
                position,
                text: self.chunks[position].clone(),
                distance,
            })
            .collect())
    }

    /// Number of chunks in the corpus.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the corpus is empty. Always false for a built retriever.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
