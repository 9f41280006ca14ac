use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::state::{ConsultState, Patch, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::speech::SpeechToText;

/// Turns the audio input into `transcribed_text`; without audio the typed query passes
/// through. A failed transcription falls back to the typed query.
pub struct TranscribeNode {
    stt: Arc<dyn SpeechToText>,
}

impl TranscribeNode {
    pub const ID: &'static str = "transcribe";

    pub fn new(stt: Arc<dyn SpeechToText>) -> Self {
        Self { stt }
    }
}

#[async_trait]
impl Node<ConsultState> for TranscribeNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::AudioInput, StateField::QueryText])
            .writes([StateField::TranscribedText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let typed = || Patch::from_option(state.query_text.clone());
        let transcript = match &state.audio_input {
            None => typed(),
            Some(audio) => match self.stt.transcribe(audio).await {
                Ok(text) => Patch::Set(text),
                Err(error) => {
                    tracing::warn!(%error, "transcription failed, using typed query");
                    typed()
                }
            },
        };
        Ok((StateUpdate::new().transcribed_text(transcript), Next::Continue))
    }
}
