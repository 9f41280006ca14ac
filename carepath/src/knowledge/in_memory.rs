use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::CollaboratorError;

use super::{rank, Embedder, KnowledgeStore, Passage};

/// Pure in-memory passage store with similarity search.
///
/// **In-Memory**: all data lives in a `DashMap` and is lost when the store is dropped.
/// Each insert is atomic per entry, so concurrent readers never see half a passage.
pub struct InMemoryKnowledgeStore {
    data: DashMap<u64, Entry>,
    next_id: AtomicU64,
    embedder: Arc<dyn Embedder>,
}

#[derive(Clone)]
struct Entry {
    vector: Vec<f32>,
    passage: Passage,
}

impl InMemoryKnowledgeStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicU64::new(0),
            embedder,
        }
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        self.embedder
            .embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::Retrieval("no vector returned".into()))
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, CollaboratorError> {
        if k == 0 || query.trim().is_empty() || self.data.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self.embed_one(query).await?;
        let mut entries: Vec<(u64, Entry)> = self
            .data
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        Ok(rank(
            &query_vec,
            entries.into_iter().map(|(_, e)| (e.vector, e.passage)),
            k,
            self.embedder.min_relevance(),
        ))
    }

    async fn add(&self, passage: Passage) -> Result<(), CollaboratorError> {
        let vector = self.embed_one(&passage.text).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.data.insert(id, Entry { vector, passage });
        Ok(())
    }

    async fn count(&self) -> Result<usize, CollaboratorError> {
        Ok(self.data.len())
    }
}
