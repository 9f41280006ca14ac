use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::state::{ConsultState, Patch, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::speech::TextToSpeech;

/// Speaks `response_text` into `response_audio`.
///
/// Empty text or a synthesis failure leaves the response without audio; the text answer
/// is never lost.
pub struct VoiceNode {
    tts: Arc<dyn TextToSpeech>,
}

impl VoiceNode {
    pub const ID: &'static str = "voice";

    pub fn new(tts: Arc<dyn TextToSpeech>) -> Self {
        Self { tts }
    }
}

#[async_trait]
impl Node<ConsultState> for VoiceNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::ResponseText])
            .writes([StateField::ResponseAudio])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let text = state.response_text.as_deref().map(str::trim).unwrap_or("");
        let audio = if text.is_empty() {
            Patch::Clear
        } else {
            match self.tts.synthesize(text).await {
                Ok(handle) => Patch::Set(handle),
                Err(error) => {
                    tracing::warn!(%error, "speech synthesis failed, answering without audio");
                    Patch::Clear
                }
            }
        };
        Ok((StateUpdate::new().response_audio(audio), Next::Continue))
    }
}
