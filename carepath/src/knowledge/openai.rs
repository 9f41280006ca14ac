//! OpenAI embeddings client implementing `Embedder` (feature `openai`).
//!
//! Works against any OpenAI-compatible `/embeddings` endpoint through the config's base URL.

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig, types::embeddings::CreateEmbeddingRequestArgs, Client,
};

use crate::error::CollaboratorError;

use super::Embedder;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Vector size of `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
/// Unrelated texts still score around 0.1 to 0.2 with these models.
pub const DEFAULT_MIN_RELEVANCE: f32 = 0.35;

pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
    min_relevance: f32,
}

impl OpenAIEmbedder {
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            min_relevance: DEFAULT_MIN_RELEVANCE,
        }
    }

    /// Vector size reported by [`Embedder::dimension`]; must match the model.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_min_relevance(mut self, score: f32) -> Self {
        self.min_relevance = score;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn embed_err(e: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::Retrieval(format!("embedding: {}", e))
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CollaboratorError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let input: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(input)
            .build()
            .map_err(embed_err)?;
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(embed_err)?;

        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        if data.len() != texts.len() {
            return Err(embed_err(format!(
                "expected {} vectors, got {}",
                texts.len(),
                data.len()
            )));
        }
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn min_relevance(&self) -> f32 {
        self.min_relevance
    }
}
