//! Reference knowledge for retrieval-grounded answers.
//!
//! A [`KnowledgeStore`] holds [`Passage`]s and returns the ones most similar to a query.
//! Similarity is cosine over vectors from an [`Embedder`]. The bundled [`HashingEmbedder`]
//! needs no model download. `OpenAIEmbedder` (feature `openai`) calls a hosted model.
//!
//! Two stores are used by the consultation graph: the reference store seeded at startup
//! (see [`seed`]) and the preventive cache that grows as pages are scraped.

mod embedder;
mod in_memory;
pub mod seed;
pub mod splitter;

#[cfg(feature = "openai")]
mod openai;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use embedder::{cosine_similarity, Embedder, HashingEmbedder};
pub use in_memory::InMemoryKnowledgeStore;

#[cfg(feature = "openai")]
pub use openai::{OpenAIEmbedder, DEFAULT_EMBEDDING_MODEL};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKnowledgeStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// One retrievable chunk of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    /// Where the text came from (URL or `"fallback"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Passage store with similarity search.
///
/// Implementations are `Send + Sync` and tolerate concurrent `add` and `search`: a reader
/// sees each passage either fully added or not at all.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Up to `k` passages most similar to `query`, best first. Passages below the
    /// embedder's [`Embedder::min_relevance`] are not returned; an empty store yields an
    /// empty list.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, CollaboratorError>;

    async fn add(&self, passage: Passage) -> Result<(), CollaboratorError>;

    async fn count(&self) -> Result<usize, CollaboratorError>;
}

/// Scores `candidates` against `query_vec` and keeps the best `k` whose similarity is
/// positive and at least `min_score`.
///
/// Ties keep candidate order so results are deterministic.
pub(crate) fn rank<I>(query_vec: &[f32], candidates: I, k: usize, min_score: f32) -> Vec<Passage>
where
    I: IntoIterator<Item = (Vec<f32>, Passage)>,
{
    let mut scored: Vec<(f32, Passage)> = candidates
        .into_iter()
        .map(|(vector, passage)| (cosine_similarity(query_vec, &vector), passage))
        .filter(|(score, _)| *score > 0.0 && *score >= min_score)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored.into_iter().map(|(_, p)| p).collect()
}
