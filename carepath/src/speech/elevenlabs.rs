//! ElevenLabs text-to-speech; each reply is written to its own mp3 file.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CollaboratorError;
use crate::http::{default_client, ensure_success, join_url};
use crate::media::MediaHandle;

use super::TextToSpeech;

pub const DEFAULT_VOICE_ID: &str = "ZF6FPAbjXT4488VcRRnw";
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
const MODEL_ID: &str = "eleven_turbo_v2";
const OUTPUT_FORMAT: &str = "mp3_22050_32";

#[derive(Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

pub struct ElevenLabsSpeech {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    base_url: String,
    output_dir: PathBuf,
}

impl ElevenLabsSpeech {
    pub fn new(api_key: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: default_client(),
            api_key: api_key.into(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Unique target path inside the output directory.
    fn next_output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("reply-{}.mp3", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str) -> Result<MediaHandle, CollaboratorError> {
        let url = join_url(&self.base_url, &format!("text-to-speech/{}", self.voice_id));
        let response = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .query(&[("output_format", OUTPUT_FORMAT)])
            .json(&TextToSpeechRequest {
                text,
                model_id: MODEL_ID,
            })
            .send()
            .await
            .map_err(|e| CollaboratorError::Synthesis(format!("request failed: {}", e)))?;
        let response = ensure_success(response, "ElevenLabs TTS API")
            .await
            .map_err(CollaboratorError::Synthesis)?;
        let audio = response
            .bytes()
            .await
            .map_err(|e| CollaboratorError::Synthesis(format!("failed to read audio: {}", e)))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CollaboratorError::Synthesis(format!("cannot create output dir: {}", e)))?;
        let path = self.next_output_path();
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| CollaboratorError::Synthesis(format!("cannot write audio: {}", e)))?;
        tracing::debug!(path = %path.display(), bytes = audio.len(), "speech written");
        Ok(MediaHandle::new(path))
    }
}
