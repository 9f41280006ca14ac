//! Vision analysis through an OpenAI-compatible `/chat/completions` endpoint.
//!
//! The image is sent inline as a base64 data URL next to the text prompt.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::error::CollaboratorError;
use crate::http::{default_client, ensure_success, join_url};
use crate::media::MediaHandle;

use super::VisionAnalyzer;

pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiVision {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiVision {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: default_client(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_VISION_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn data_url(image: &MediaHandle, bytes: &[u8]) -> String {
        let mime = match image.extension().as_deref() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };
        format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }
}

#[async_trait]
impl VisionAnalyzer for OpenAiVision {
    async fn analyze(&self, image: &MediaHandle, prompt: &str) -> Result<String, CollaboratorError> {
        let bytes = tokio::fs::read(image.path()).await.map_err(|e| {
            CollaboratorError::Vision(format!("cannot read {}: {}", image.path().display(), e))
        })?;
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": Self::data_url(image, &bytes) } }
                ]
            }]
        });

        let response = self
            .client
            .post(join_url(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Vision(format!("request failed: {}", e)))?;
        let response = ensure_success(response, "vision API")
            .await
            .map_err(CollaboratorError::Vision)?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Vision(format!("bad response: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| CollaboratorError::Vision("vision API returned no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The data URL carries the MIME type from the extension and base64 payload.
    #[test]
    fn data_url_encodes_image() {
        let url = OpenAiVision::data_url(&"rash.png".into(), b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert!(OpenAiVision::data_url(&"rash".into(), b"").starts_with("data:image/jpeg"));
    }

    /// **Scenario**: A missing image fails with a Vision error.
    #[tokio::test]
    async fn missing_image_is_vision_error() {
        let vision = OpenAiVision::new("key", "http://127.0.0.1:9");
        let err = vision
            .analyze(&"/nonexistent/rash.jpg".into(), "look")
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Vision(_)));
    }
}
