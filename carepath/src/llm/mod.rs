//! Text completion and intent classification collaborators.
//!
//! Nodes depend on [`LlmClient`] for free-text answers and on [`Classifier`] for the
//! top-level routing decision. Implementations: `MockLlm` / `MockClassifier` (fixed
//! responses, call counters) and `ChatOpenAI` (real API, feature `openai`).

mod classifier;
mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use classifier::LlmClassifier;
pub use mock::{MockClassifier, MockLlm};

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::CollaboratorError;

/// Completion client: one prompt (plus optional retrieved context) in, answer text out.
///
/// **Interaction**: Used by the knowledge, preventive and general nodes; wrapped by
/// [`LlmClassifier`] for routing.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// `prompt` is the instruction and question; `context` is retrieved reference text the
    /// answer should be grounded on.
    async fn complete(&self, prompt: &str, context: Option<&str>)
        -> Result<String, CollaboratorError>;
}

/// Assigns one of `allowed_labels` to `text`.
///
/// The returned string is raw model output; callers map it onto their closed label set and
/// treat anything unrecognized as the fallback.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        allowed_labels: &[&str],
    ) -> Result<String, CollaboratorError>;
}
