//! One compiled graph shared by concurrent runs.

use carepath::{ConsultState, ConsultationGraph, Workflow};

use crate::common::Fixture;

/// **Scenario**: Concurrent runs on one graph each see only their own request.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_are_isolated() {
    let f = Fixture::new("general");
    let graph = ConsultationGraph::build(Workflow::Consultation, &f.collaborators()).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let graph = graph.clone();
            tokio::spawn(async move {
                let query = format!("question number {}", i);
                let out = graph.run(ConsultState::from_text(query.clone())).await.unwrap();
                (query, out)
            })
        })
        .collect();

    for handle in handles {
        let (query, out) = handle.await.unwrap();
        assert_eq!(out.transcribed_text, Some(query));
        assert_eq!(out.route_label, None);
    }
    assert_eq!(f.llm.call_count(), 16);
}
