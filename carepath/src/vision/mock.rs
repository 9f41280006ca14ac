use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::media::MediaHandle;

use super::VisionAnalyzer;

/// Mock vision model: fixed observation or failure; records prompts.
pub struct MockVision {
    result: Result<String, CollaboratorError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockVision {
    pub fn new(observation: impl Into<String>) -> Self {
        Self {
            result: Ok(observation.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VisionAnalyzer for MockVision {
    async fn analyze(&self, _image: &MediaHandle, prompt: &str) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.result.clone()
    }
}
