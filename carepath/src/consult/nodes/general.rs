use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::messages::{general_prompt, ASK_QUESTION, COMPLETION_APOLOGY};
use crate::consult::state::{ConsultState, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::llm::LlmClient;

/// Answers general health questions with one completion. An empty query halts with a
/// clarification before any collaborator is called.
pub struct GeneralNode {
    llm: Arc<dyn LlmClient>,
}

impl GeneralNode {
    pub const ID: &'static str = "general";

    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<ConsultState> for GeneralNode {
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
            return Ok((StateUpdate::new().response_text(ASK_QUESTION), Next::End));
        }
        let text = match self.llm.complete(&general_prompt(query), None).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "general completion failed");
                COMPLETION_APOLOGY.to_string()
            }
        };
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}
