//! Speech collaborators: transcription of the patient's audio and synthesis of the reply.
//!
//! Implementations: `MockSpeechToText` / `MockTextToSpeech` (fixed results, call counters),
//! `WhisperTranscriber` and `ElevenLabsSpeech` (feature `remote`).

mod mock;

#[cfg(feature = "remote")]
mod elevenlabs;
#[cfg(feature = "remote")]
mod whisper;

pub use mock::{MockSpeechToText, MockTextToSpeech};

#[cfg(feature = "remote")]
pub use elevenlabs::ElevenLabsSpeech;
#[cfg(feature = "remote")]
pub use whisper::WhisperTranscriber;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::media::MediaHandle;

/// Audio file in, transcript out. Fails with `CollaboratorError::Transcription`.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &MediaHandle) -> Result<String, CollaboratorError>;
}

/// Text in, handle to a freshly written audio file out. Fails with
/// `CollaboratorError::Synthesis`.
///
/// Every call must produce a distinct file so concurrent requests never overwrite each
/// other's audio.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<MediaHandle, CollaboratorError>;
}
