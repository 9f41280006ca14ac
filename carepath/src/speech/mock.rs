use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::media::MediaHandle;

use super::{SpeechToText, TextToSpeech};

/// Mock transcriber: fixed transcript or a fixed failure.
pub struct MockSpeechToText {
    result: Result<String, CollaboratorError>,
    calls: AtomicUsize,
}

impl MockSpeechToText {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            result: Ok(transcript.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, _audio: &MediaHandle) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Mock synthesizer: returns a fixed handle (no file is written) and records the texts.
pub struct MockTextToSpeech {
    result: Result<MediaHandle, CollaboratorError>,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl MockTextToSpeech {
    pub fn new(handle: impl Into<MediaHandle>) -> Self {
        Self {
            result: Ok(handle.into()),
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts passed to `synthesize`, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextToSpeech for MockTextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<MediaHandle, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(text.to_string());
        }
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The synthesizer mock records texts and returns its handle.
    #[tokio::test]
    async fn mock_tts_records_texts() {
        let tts = MockTextToSpeech::new("out/reply.mp3");
        let handle = tts.synthesize("hello").await.unwrap();
        assert_eq!(handle, MediaHandle::from("out/reply.mp3"));
        assert_eq!(tts.texts(), vec!["hello"]);
        assert_eq!(tts.call_count(), 1);
    }

    /// **Scenario**: A failing transcriber returns its error and counts the call.
    #[tokio::test]
    async fn failing_stt_returns_error() {
        let stt = MockSpeechToText::failing(CollaboratorError::Transcription("corrupt".into()));
        let err = stt.transcribe(&MediaHandle::from("a.wav")).await.unwrap_err();
        assert_eq!(err, CollaboratorError::Transcription("corrupt".into()));
        assert_eq!(stt.call_count(), 1);
    }
}
