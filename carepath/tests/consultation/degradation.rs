//! Failing collaborators degrade the answer but never fail the run.

use std::sync::Arc;

use carepath::consult::messages::{COMPLETION_APOLOGY, SEARCH_APOLOGY, VISION_APOLOGY};
use carepath::{
    CollaboratorError, Collaborators, ConsultState, ConsultationGraph, MockClassifier, MockLlm,
    MockSpeechToText, MockTextToSpeech, MockVision, MockWebSearch, Workflow,
};

use crate::common::Fixture;

/// **Scenario**: A failed transcription falls back to the typed query.
#[tokio::test]
async fn failed_transcription_uses_typed_query() {
    let f = Fixture::new("general");
    let c = Collaborators {
        stt: Arc::new(MockSpeechToText::failing(CollaboratorError::Transcription(
            "unsupported codec".into(),
        ))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &c).unwrap();
    let out = graph
        .run(ConsultState::from_text("typed fallback").with_audio("broken.ogg"))
        .await
        .unwrap();
    assert_eq!(out.transcribed_text.as_deref(), Some("typed fallback"));
    assert_eq!(out.response_text.as_deref(), Some("Mock answer."));
}

/// **Scenario**: A failed synthesis keeps the text answer and leaves audio absent.
#[tokio::test]
async fn failed_synthesis_keeps_text() {
    let f = Fixture::new("general");
    let c = Collaborators {
        tts: Arc::new(MockTextToSpeech::failing(CollaboratorError::Synthesis(
            "quota exceeded".into(),
        ))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &c).unwrap();
    let out = graph.run(ConsultState::from_text("hello")).await.unwrap();
    assert_eq!(out.response_text.as_deref(), Some("Mock answer."));
    assert_eq!(out.response_audio, None);
}

/// **Scenario**: A failed classification routes to general.
#[tokio::test]
async fn failed_classification_routes_general() {
    let f = Fixture::new("general");
    let c = Collaborators {
        classifier: Arc::new(MockClassifier::failing(CollaboratorError::Classification(
            "timeout".into(),
        ))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &c).unwrap();
    let out = graph.run(ConsultState::from_text("I feel dizzy")).await.unwrap();
    assert_eq!(out.response_text.as_deref(), Some("Mock answer."));
    assert_eq!(f.llm.call_count(), 1);
}

/// **Scenario**: Completion, vision and search failures become apology texts.
#[tokio::test]
async fn collaborator_failures_become_apologies() {
    let f = Fixture::new("general");
    let failing_llm = Collaborators {
        llm: Arc::new(MockLlm::failing(CollaboratorError::Completion("503".into()))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &failing_llm).unwrap();
    let out = graph.run(ConsultState::from_text("hello")).await.unwrap();
    assert_eq!(out.response_text.as_deref(), Some(COMPLETION_APOLOGY));

    let f = Fixture::new("symptom");
    let failing_vision = Collaborators {
        vision: Arc::new(MockVision::failing(CollaboratorError::Vision("blurry".into()))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &failing_vision).unwrap();
    let out = graph
        .run(ConsultState::from_text("look").with_image("x.png"))
        .await
        .unwrap();
    assert_eq!(out.response_text.as_deref(), Some(VISION_APOLOGY));

    let f = Fixture::new("preventive");
    let failing_web = Collaborators {
        web: Arc::new(MockWebSearch::failing(CollaboratorError::Search("quota".into()))),
        ..f.collaborators()
    };
    let graph = ConsultationGraph::build(Workflow::Consultation, &failing_web).unwrap();
    let out = graph
        .run(ConsultState::from_text("how to avoid the flu"))
        .await
        .unwrap();
    let text = out.response_text.unwrap_or_default();
    assert!(text.contains(SEARCH_APOLOGY));
    assert!(text.contains("Video links:"));
}

/// **Scenario**: The offline collaborator set answers every branch without failing.
#[tokio::test]
async fn offline_collaborators_never_fail() {
    let graph =
        ConsultationGraph::build(Workflow::Consultation, &Collaborators::offline()).unwrap();
    for query in ["", "tips to prevent colds", "I have a rash"] {
        let out = graph
            .run(ConsultState::from_text(query).with_audio("a.wav"))
            .await
            .unwrap();
        assert!(out.response_text.is_some());
        assert_eq!(out.response_audio, None);
    }
}
