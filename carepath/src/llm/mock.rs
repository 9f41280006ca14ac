//! Mock completion and classification clients for tests and offline runs.
//!
//! Return fixed (or scripted) text and count calls; no network required.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CollaboratorError;

use super::{Classifier, LlmClient};

/// Mock LLM: returns scripted replies in order, then the fixed response.
///
/// Records every prompt and context it receives so tests can assert on what a node asked.
pub struct MockLlm {
    response: String,
    script: Mutex<VecDeque<String>>,
    error: Option<CollaboratorError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    contexts: Mutex<Vec<Option<String>>>,
}

impl MockLlm {
    /// Always answers with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            script: Mutex::new(VecDeque::new()),
            error: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            error: Some(error),
            ..Self::new("")
        }
    }

    /// Answers with `replies` in order before falling back to the fixed response.
    pub fn with_script<I, T>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn contexts(&self) -> Vec<Option<String>> {
        self.contexts.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new("This is a mock answer. Please consult a doctor for medical advice.")
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context.map(ToString::to_string));
        }
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        Ok(scripted.unwrap_or_else(|| self.response.clone()))
    }
}

/// Mock classifier: returns a fixed label (or fails) and counts calls.
pub struct MockClassifier {
    label: String,
    error: Option<CollaboratorError>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            error: Some(error),
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new("general")
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        _text: &str,
        _allowed_labels: &[&str],
    ) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.label.clone()),
        }
    }
}
