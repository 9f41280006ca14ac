//! Symptom branch: image analysis and knowledge-grounded answers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::messages::{
    knowledge_prompt, ASK_SYMPTOMS, COMPLETION_APOLOGY, NO_IMAGE, RETRIEVAL_APOLOGY,
    VISION_APOLOGY, VISION_PROMPT,
};
use crate::consult::state::{ConsultState, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::knowledge::KnowledgeStore;
use crate::llm::LlmClient;
use crate::vision::VisionAnalyzer;

use super::RETRIEVAL_K;

/// Asks the vision model about the attached image, with the doctor prompt prefixed to the
/// patient's words.
pub struct VisionNode {
    vision: Arc<dyn VisionAnalyzer>,
}

impl VisionNode {
    pub const ID: &'static str = "analyze_image";

    pub fn new(vision: Arc<dyn VisionAnalyzer>) -> Self {
        Self { vision }
    }
}

#[async_trait]
impl Node<ConsultState> for VisionNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::ImageInput, StateField::TranscribedText])
            .writes([StateField::ResponseText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let Some(image) = &state.image_input else {
            return Ok((StateUpdate::new().response_text(NO_IMAGE), Next::Continue));
        };
        let prompt = format!("{}{}", VISION_PROMPT, state.query());
        let text = match self.vision.analyze(image, &prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "image analysis failed");
                VISION_APOLOGY.to_string()
            }
        };
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}

/// Answers from the reference knowledge store: top passages as context for one completion.
///
/// An empty query is answered with a clarification and ends the run.
pub struct KnowledgeNode {
    store: Arc<dyn KnowledgeStore>,
    llm: Arc<dyn LlmClient>,
}

impl KnowledgeNode {
    pub const ID: &'static str = "query_knowledge";

    pub fn new(store: Arc<dyn KnowledgeStore>, llm: Arc<dyn LlmClient>) -> Self {
        Self { store, llm }
    }
}

#[async_trait]
impl Node<ConsultState> for KnowledgeNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::TranscribedText])
            .writes([StateField::ResponseText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let query = state.query();
        if query.is_empty() {
            return Ok((StateUpdate::new().response_text(ASK_SYMPTOMS), Next::End));
        }
        let passages = match self.store.search(query, RETRIEVAL_K).await {
            Ok(passages) => passages,
            Err(error) => {
                tracing::warn!(%error, "knowledge retrieval failed");
                return Ok((StateUpdate::new().response_text(RETRIEVAL_APOLOGY), Next::Continue));
            }
        };
        tracing::debug!(passages = passages.len(), "retrieved reference passages");
        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let text = match self.llm.complete(&knowledge_prompt(query), Some(&context)).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "completion failed");
                COMPLETION_APOLOGY.to_string()
            }
        };
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}
