//! Intent routing: classifier labels, defaults, unresolved edges, label consumption.

use std::sync::Arc;

use carepath::consult::nodes::{GeneralNode, IntentRouterNode, TranscribeNode};
use carepath::consult::{Intent, RouteLabel};
use carepath::graph::{END, START};
use carepath::{
    AgentError, CompilationError, Completion, ConsultState, ConsultationGraph, StateGraph,
    Workflow,
};

use crate::common::Fixture;

/// **Scenario**: An empty request is routed to general, which asks for a question; no
/// collaborator is invoked.
#[tokio::test]
async fn empty_request_asks_for_a_question() {
    let f = Fixture::new("symptom");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let outcome = graph.run_outcome(ConsultState::from_text("")).await.unwrap();

    assert_eq!(
        outcome.state.response_text.as_deref(),
        Some("Please ask a question or describe your symptoms.")
    );
    assert_eq!(
        outcome.completion,
        Completion::Halted {
            node: "general".into()
        }
    );
    assert_eq!(outcome.state.response_audio, None);
    assert_eq!(f.classifier.call_count(), 0);
    assert_eq!(f.llm.call_count(), 0);
    assert_eq!(f.stt.call_count(), 0);
    assert_eq!(f.tts.call_count(), 0);
}

/// **Scenario**: Without audio, the transcript equals the typed query.
#[tokio::test]
async fn typed_query_becomes_transcript() {
    let f = Fixture::new("general");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let out = graph
        .run(ConsultState::from_text("is coffee bad for me"))
        .await
        .unwrap();
    assert_eq!(out.transcribed_text.as_deref(), Some("is coffee bad for me"));
    assert_eq!(f.stt.call_count(), 0);
}

/// **Scenario**: Spoken requests are transcribed before classification.
#[tokio::test]
async fn audio_is_transcribed_first() {
    let f = Fixture::new("general");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let out = graph
        .run(ConsultState::default().with_audio("question.wav"))
        .await
        .unwrap();
    assert_eq!(out.transcribed_text.as_deref(), Some("spoken question"));
    assert_eq!(f.stt.call_count(), 1);
    assert!(f.llm.prompts()[0].ends_with("spoken question"));
}

/// **Scenario**: An unrecognized classification takes the declared default (general).
#[tokio::test]
async fn unknown_label_takes_default_successor() {
    let f = Fixture::new("astrology");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let out = graph.run(ConsultState::from_text("hello")).await.unwrap();
    assert_eq!(out.response_text.as_deref(), Some("Mock answer."));
    assert_eq!(out.response_audio.as_ref().and_then(|a| a.file_name()), Some("reply.mp3"));
    assert_eq!(f.classifier.call_count(), 1);
}

/// **Scenario**: The route label is consumed by the edge and never survives into the
/// final state, whichever branch ran.
#[tokio::test]
async fn route_label_never_in_final_state() {
    for label in ["symptom", "preventive", "general"] {
        let f = Fixture::new(label);
        f.seed_reference().await;
        let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
        let out = graph
            .run(ConsultState::from_text("tips to prevent a headache"))
            .await
            .unwrap();
        assert_eq!(out.route_label, None, "label {} leaked", label);
    }
}

fn router_without_default() -> StateGraph<ConsultState> {
    let f = Fixture::new("preventive");
    let c = f.collaborators();
    let mut g = StateGraph::new("partial");
    g.add_node(TranscribeNode::ID, Arc::new(TranscribeNode::new(c.stt.clone())))
        .add_node(
            IntentRouterNode::ID,
            Arc::new(IntentRouterNode::new(c.classifier.clone())),
        )
        .add_node(GeneralNode::ID, Arc::new(GeneralNode::new(c.llm.clone())))
        .add_edge(START, TranscribeNode::ID)
        .add_edge(TranscribeNode::ID, IntentRouterNode::ID)
        .add_conditional_edges(
            IntentRouterNode::ID,
            [(RouteLabel::Intent(Intent::Symptom), GeneralNode::ID)],
            None,
        )
        .add_edge(GeneralNode::ID, END);
    g
}

/// **Scenario**: A label missing from the route map with no default fails the run with
/// `UnresolvedEdge` instead of looping.
#[tokio::test]
async fn unmapped_label_without_default_is_unresolved() {
    let graph = router_without_default().compile().unwrap();
    match graph.invoke(ConsultState::from_text("x")).await {
        Err(AgentError::UnresolvedEdge { graph, node, label }) => {
            assert_eq!(graph, "partial");
            assert_eq!(node, IntentRouterNode::ID);
            assert_eq!(label.as_deref(), Some("Intent(Preventive)"));
        }
        other => panic!("expected UnresolvedEdge, got {:?}", other.map(|s| s.response_text)),
    }
}

/// **Scenario**: Compilation rejects a node that reads a field nothing wrote.
#[test]
fn compile_rejects_unsatisfied_read() {
    let f = Fixture::new("general");
    let mut g = StateGraph::<ConsultState>::new("bare");
    g.add_node(GeneralNode::ID, Arc::new(GeneralNode::new(f.llm.clone())))
        .add_edge(START, GeneralNode::ID)
        .add_edge(GeneralNode::ID, END);
    assert_eq!(
        g.compile().err(),
        Some(CompilationError::UnsatisfiedRead {
            node: GeneralNode::ID.into(),
            field: "TranscribedText".into(),
        })
    );
}

/// **Scenario**: Compilation rejects cycles.
#[test]
fn compile_rejects_cycles() {
    let f = Fixture::new("general");
    let mut g = StateGraph::<ConsultState>::new("loop");
    g.add_node(TranscribeNode::ID, Arc::new(TranscribeNode::new(f.stt.clone())))
        .add_node(GeneralNode::ID, Arc::new(GeneralNode::new(f.llm.clone())))
        .add_edge(START, TranscribeNode::ID)
        .add_edge(TranscribeNode::ID, GeneralNode::ID)
        .add_edge(GeneralNode::ID, TranscribeNode::ID);
    assert!(matches!(
        g.compile().err(),
        Some(CompilationError::CycleDetected(_))
    ));
}
