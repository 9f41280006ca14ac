use async_trait::async_trait;

use crate::error::CollaboratorError;

/// Turns texts into fixed-dimension vectors for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CollaboratorError>;

    fn dimension(&self) -> usize;

    /// Lowest cosine score that still counts as relevant. Stores drop weaker matches.
    ///
    /// Default 0.0: any positive similarity counts. Model embedders, whose unrelated texts
    /// still score well above zero, return a higher floor.
    fn min_relevance(&self) -> f32 {
        0.0
    }
}

/// Words too common to say anything about a passage's topic.
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for",
    "from", "how", "i", "if", "in", "is", "it", "me", "my", "of", "on", "or", "should", "so",
    "that", "the", "this", "to", "what", "when", "which", "who", "why", "will", "with", "you",
    "your",
];

/// Bag-of-words embedder: each lowercase alphanumeric token that is not a stop word is
/// hashed (FNV-1a) into one of `dimension` buckets; the vector is L2-normalised.
///
/// Texts sharing topic words score higher. No model or network is involved.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
}

pub const DEFAULT_DIMENSION: usize = 512;

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        (hash % self.dimension as u64) as usize
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        let lower = text.to_lowercase();
        for token in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 1 && !STOP_WORDS.contains(t))
        {
            vector[self.bucket(token)] += 1.0;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CollaboratorError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
