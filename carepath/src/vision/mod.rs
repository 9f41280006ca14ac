//! Image analysis collaborator.

mod mock;

#[cfg(feature = "remote")]
mod openai;

pub use mock::MockVision;

#[cfg(feature = "remote")]
pub use openai::OpenAiVision;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::media::MediaHandle;

/// Image plus instruction in, free-text observation out. Fails with
/// `CollaboratorError::Vision`.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze(&self, image: &MediaHandle, prompt: &str) -> Result<String, CollaboratorError>;
}
