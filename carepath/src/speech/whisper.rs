//! Whisper transcription over an OpenAI-compatible `/audio/transcriptions` endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::CollaboratorError;
use crate::http::{default_client, ensure_success, join_url};
use crate::media::MediaHandle;

use super::SpeechToText;

pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3";

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads the audio file as multipart form data and returns the transcript text.
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: default_client(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_STT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn mime_for(audio: &MediaHandle) -> &'static str {
        match audio.extension().as_deref() {
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("m4a") => "audio/mp4",
            Some("ogg") => "audio/ogg",
            Some("webm") => "audio/webm",
            _ => "application/octet-stream",
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    async fn transcribe(&self, audio: &MediaHandle) -> Result<String, CollaboratorError> {
        let bytes = tokio::fs::read(audio.path()).await.map_err(|e| {
            CollaboratorError::Transcription(format!(
                "cannot read {}: {}",
                audio.path().display(),
                e
            ))
        })?;
        let file_name = audio.file_name().unwrap_or("audio").to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(Self::mime_for(audio))
            .map_err(|e| CollaboratorError::Transcription(e.to_string()))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("language", "en")
            .part("file", part);

        let response = self
            .client
            .post(join_url(&self.base_url, "audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transcription(format!("request failed: {}", e)))?;
        let response = ensure_success(response, "transcription API")
            .await
            .map_err(CollaboratorError::Transcription)?;
        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Transcription(format!("bad response: {}", e)))?;
        Ok(body.text.trim().to_string())
    }
}
