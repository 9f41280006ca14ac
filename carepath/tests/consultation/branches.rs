//! Branch answers: symptom (knowledge and vision), preventive, hospitals.

use carepath::consult::build_symptom;
use carepath::consult::messages::{ASK_PREVENTIVE, ASK_SYMPTOMS};
use carepath::{
    Completion, ConsultState, ConsultationGraph, GeoPoint, KnowledgeStore, MockPlaces, Place, Workflow,
};

use crate::common::Fixture;

/// **Scenario**: A text-only symptom question is answered from the reference knowledge and
/// spoken.
#[tokio::test]
async fn symptom_text_uses_knowledge() {
    let f = Fixture::new("symptom");
    f.seed_reference().await;
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let outcome = graph
        .run_outcome(ConsultState::from_text("I have a headache and fever"))
        .await
        .unwrap();

    assert_eq!(outcome.completion, Completion::Finished);
    assert_eq!(outcome.state.response_text.as_deref(), Some("Mock answer."));
    assert!(outcome.state.response_audio.is_some());
    assert_eq!(f.vision.call_count(), 0);
    let context = f.llm.contexts()[0].clone().unwrap_or_default();
    assert!(context.contains("headache"));
}

/// **Scenario**: An attached image always selects the vision path.
#[tokio::test]
async fn symptom_with_image_uses_vision() {
    let f = Fixture::new("symptom");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let out = graph
        .run(ConsultState::from_text("what is this on my arm").with_image("arm.jpg"))
        .await
        .unwrap();

    assert_eq!(
        out.response_text.as_deref(),
        Some("With what I see, I think you have a rash.")
    );
    assert_eq!(f.vision.call_count(), 1);
    assert_eq!(f.llm.call_count(), 0);
    assert_eq!(f.tts.call_count(), 1);
}

/// **Scenario**: A photo with no question is analyzed instead of being asked to clarify.
#[tokio::test]
async fn image_without_text_uses_vision() {
    let f = Fixture::new("general");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let outcome = graph
        .run_outcome(ConsultState::default().with_image("rash.jpg"))
        .await
        .unwrap();

    assert_eq!(outcome.completion, Completion::Finished);
    assert_eq!(
        outcome.state.response_text.as_deref(),
        Some("With what I see, I think you have a rash.")
    );
    assert_eq!(f.vision.call_count(), 1);
    assert_eq!(f.classifier.call_count(), 0);
    assert_eq!(f.tts.call_count(), 1);
}

/// **Scenario**: A clarification inside the knowledge sub-graph halts the symptom branch
/// before the voice node.
#[tokio::test]
async fn empty_symptom_request_halts_through_subgraphs() {
    let f = Fixture::new("symptom");
    let symptom = build_symptom(&f.collaborators(), &None).unwrap();
    let outcome = symptom.run(ConsultState::from_text("  ")).await.unwrap();

    assert_eq!(
        outcome.completion,
        Completion::Halted {
            node: "knowledge".into()
        }
    );
    assert_eq!(outcome.state.response_text.as_deref(), Some(ASK_SYMPTOMS));
    assert_eq!(f.tts.call_count(), 0);
    assert_eq!(f.llm.call_count(), 0);
}

/// **Scenario**: "how to prevent malaria" gets web guidance and video links, then audio.
#[tokio::test]
async fn preventive_answer_has_both_sections() {
    let f = Fixture::new("preventive");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let out = graph
        .run(ConsultState::from_text("how to prevent malaria").with_image("ignored.jpg"))
        .await
        .unwrap();

    let text = out.response_text.unwrap_or_default();
    assert!(text.starts_with("Here are some preventive measures:\n\nFrom the web:\n"));
    assert!(text.contains("\n\nVideo links:\n"));
    assert!(text.contains("https://youtube.example/nets"));
    assert!(out.response_audio.is_some());
    assert_eq!(out.image_input, None);
    assert_eq!(f.vision.call_count(), 0);
    assert!(f.cache.count().await.unwrap() > 0);
}

/// **Scenario**: A preventive request without a prevention keyword gets the fixed
/// clarification, no audio, and no retrieval or search.
#[tokio::test]
async fn preventive_without_keyword_is_clarified() {
    let f = Fixture::new("preventive");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();
    let outcome = graph
        .run_outcome(ConsultState::from_text("what is malaria"))
        .await
        .unwrap();

    assert_eq!(outcome.state.response_text.as_deref(), Some(ASK_PREVENTIVE));
    assert_eq!(outcome.state.response_audio, None);
    assert_eq!(
        outcome.completion,
        Completion::Halted {
            node: "preventive".into()
        }
    );
    assert_eq!(f.web.search_count(), 0);
    assert_eq!(f.llm.call_count(), 0);
    assert_eq!(f.tts.call_count(), 0);
}

/// **Scenario**: The hospital variant lists nearby places and speaks them.
#[tokio::test]
async fn hospital_variant_lists_places() {
    let mut f = Fixture::new("general");
    f.places = std::sync::Arc::new(MockPlaces::new(vec![Place {
        title: "City Hospital".into(),
        address: Some("1 Main St".into()),
        phone: Some("555-0100".into()),
        website: None,
    }]));
    let graph = ConsultationGraph::build(Workflow::Hospitals, &f.collaborators()).unwrap();
    let out = graph
        .run(
            ConsultState::from_text("hospitals for knee surgery")
                .with_location(GeoPoint::new(11.27, 77.58)),
        )
        .await
        .unwrap();

    let text = out.response_text.unwrap_or_default();
    assert!(text.contains("City Hospital"));
    assert!(text.contains("Website: N/A"));
    assert!(out.response_audio.is_some());
    assert_eq!(f.places.call_count(), 1);
    assert_eq!(f.classifier.call_count(), 0);
}
