use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::state::{ConsultState, Evidence, Intent, RouteLabel, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::llm::Classifier;

/// Top-level router: labels the request symptom, preventive or general.
///
/// An empty query goes to general without asking the classifier, unless an image is attached:
/// then it is a symptom request and triage picks the vision path. A failed or unrecognized
/// classification goes to general.
pub struct IntentRouterNode {
    classifier: Arc<dyn Classifier>,
}

impl IntentRouterNode {
    pub const ID: &'static str = "route";

    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    async fn intent(&self, state: &ConsultState) -> Intent {
        let query = state.query();
        if query.is_empty() {
            return if state.image_input.is_some() {
                Intent::Symptom
            } else {
                Intent::General
            };
        }
        match self.classifier.classify(query, &Intent::LABELS).await {
            Ok(raw) => Intent::from_classification(&raw),
            Err(error) => {
                tracing::warn!(%error, "classification failed, routing to general");
                Intent::General
            }
        }
    }
}

#[async_trait]
impl Node<ConsultState> for IntentRouterNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([
                StateField::TranscribedText,
                StateField::QueryText,
                StateField::ImageInput,
            ])
            .writes([StateField::RouteLabel])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let intent = self.intent(state).await;
        tracing::info!(intent = intent.as_str(), "request classified");
        Ok((
            StateUpdate::new().route(RouteLabel::Intent(intent)),
            Next::Continue,
        ))
    }
}

/// Symptom-branch router: an attached image always selects the vision path.
pub struct TriageNode;

impl TriageNode {
    pub const ID: &'static str = "triage";
}

#[async_trait]
impl Node<ConsultState> for TriageNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::ImageInput])
            .writes([StateField::RouteLabel])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let evidence = if state.image_input.is_some() {
            Evidence::HasImage
        } else {
            Evidence::TextOnly
        };
        Ok((
            StateUpdate::new().route(RouteLabel::Evidence(evidence)),
            Next::Continue,
        ))
    }
}
