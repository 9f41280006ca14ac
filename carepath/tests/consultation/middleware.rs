//! Node middleware wraps every node, nested graphs included.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carepath::{
    AgentError, ConsultState, ConsultationGraph, Next, Node, NodeMiddleware, StateUpdate,
    Workflow,
};

use crate::common::Fixture;

#[derive(Default)]
struct Recorder {
    entered: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware<ConsultState> for Recorder {
    async fn around_run(
        &self,
        node_id: &str,
        state: &ConsultState,
        node: &dyn Node<ConsultState>,
    ) -> Result<(StateUpdate, Next), AgentError> {
        self.entered.lock().unwrap().push(node_id.to_string());
        node.run(state).await
    }
}

/// **Scenario**: The middleware sees the top-level nodes and the nodes of every sub-graph
/// on the path taken, in execution order.
#[tokio::test]
async fn middleware_sees_nested_nodes() {
    let f = Fixture::new("symptom");
    f.seed_reference().await;
    let recorder = Arc::new(Recorder::default());
    let graph = ConsultationGraph::build_with_middleware(
        Workflow::Consultation,
        &f.collaborators(),
        Some(recorder.clone()),
    )
    .unwrap();
    graph.run(ConsultState::from_text("sore throat")).await.unwrap();

    let entered = recorder.entered.lock().unwrap().clone();
    assert_eq!(
        entered,
        vec![
            "transcribe",
            "route",
            "symptom",
            "triage",
            "knowledge",
            "query_knowledge",
            "voice",
        ]
    );
}
