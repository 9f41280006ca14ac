//! Router tests through `tower::ServiceExt::oneshot`, no sockets.
//!
//! **Scenario**: Multipart requests are turned into a consultation run with mock
//! collaborators; the JSON answer and the download route are checked end to end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use carepath::{
    Collaborators, ConsultationGraph, MockClassifier, MockLlm, MockPlaces, MockTextToSpeech,
    Place, Workflow,
};
use carepath_server::{app, AppState};
use tower::ServiceExt;

const BOUNDARY: &str = "carepath-test-boundary";

/// Files first, then text fields.
fn multipart(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Body {
    let mut body = Vec::new();
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn post_process(body: Body) -> Request<Body> {
    Request::post("/process")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn state(collaborators: &Collaborators, dir: &Path) -> Arc<AppState> {
    Arc::new(AppState {
        consultation: ConsultationGraph::build(Workflow::Consultation, collaborators).unwrap(),
        hospitals: ConsultationGraph::build(Workflow::Hospitals, collaborators).unwrap(),
        upload_dir: dir.join("uploads"),
        output_dir: dir.join("output"),
        run_timeout: Duration::from_secs(10),
    })
}

fn speaking_collaborators(dir: &Path) -> Collaborators {
    let output = dir.join("output");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("reply.mp3"), b"ID3 fake audio").unwrap();
    let mut c = Collaborators::offline();
    c.llm = Arc::new(MockLlm::new("Stay hydrated and rest."));
    c.tts = Arc::new(MockTextToSpeech::new(output.join("reply.mp3")));
    c
}

/// **Scenario**: The root route answers with a liveness text.
#[tokio::test]
async fn root_reports_running() {
    let dir = tempfile::tempdir().unwrap();
    let res = app(state(&Collaborators::offline(), dir.path()))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"carepath backend is running.");
}

/// **Scenario**: A typed question returns the transcript, the answer and a download link
/// that serves the synthesized audio.
#[tokio::test]
async fn typed_question_is_answered_with_voice() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state(&speaking_collaborators(dir.path()), dir.path()));

    let res = router
        .clone()
        .oneshot(post_process(multipart(
            &[("query_text", "how much water should I drink")],
            &[],
        )))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["speech_to_text"], "how much water should I drink");
    assert_eq!(json["response_text"], "Stay hydrated and rest.");
    assert_eq!(json["voice_url"], "/download/reply.mp3");

    let res = router
        .oneshot(Request::get("/download/reply.mp3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "audio/mpeg");
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ID3 fake audio");
}

/// **Scenario**: An uploaded image drives the vision branch and is deleted once the answer
/// is sent.
#[tokio::test]
async fn uploaded_image_is_analyzed_then_removed() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = speaking_collaborators(dir.path());
    let vision = Arc::new(carepath::MockVision::new("Looks like mild eczema."));
    c.classifier = Arc::new(MockClassifier::new("symptom"));
    c.vision = vision.clone();
    let router = app(state(&c, dir.path()));

    let res = router
        .oneshot(post_process(multipart(
            &[("query_text", "what is this rash")],
            &[("image", "../rash photo.jpg", &b"\xFF\xD8\xFF"[..])],
        )))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["response_text"], "Looks like mild eczema.");
    assert_eq!(vision.call_count(), 1);

    let left = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(left, 0);
}

/// **Scenario**: Uploads saved before a bad field are removed along with the 400.
#[tokio::test]
async fn uploads_are_removed_when_the_form_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let res = app(state(&Collaborators::offline(), dir.path()))
        .oneshot(post_process(multipart(
            &[("latitude", "north")],
            &[("audio", "q.wav", &b"RIFF"[..])],
        )))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let left = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(left, 0);
}

/// **Scenario**: `mode=hospitals` with coordinates lists nearby places.
#[tokio::test]
async fn hospital_mode_lists_places() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = speaking_collaborators(dir.path());
    c.places = Arc::new(MockPlaces::new(vec![Place {
        title: "City General".into(),
        address: Some("1 Main St".into()),
        phone: None,
        website: None,
    }]));
    let res = app(state(&c, dir.path()))
        .oneshot(post_process(multipart(
            &[
                ("query_text", "knee surgery"),
                ("mode", "hospitals"),
                ("latitude", "11.27"),
                ("longitude", "77.58"),
            ],
            &[],
        )))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    let text = json["response_text"].as_str().unwrap();
    assert!(text.contains("City General"));
    assert!(text.contains("Phone: N/A"));
}

/// **Scenario**: A malformed coordinate is a 400 with a JSON error.
#[tokio::test]
async fn bad_coordinate_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let res = app(state(&Collaborators::offline(), dir.path()))
        .oneshot(post_process(multipart(
            &[("query_text", "x"), ("latitude", "north")],
            &[],
        )))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = json_body(res).await;
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("latitude"));
}

/// **Scenario**: Missing files are 404 and names with path parts are refused.
#[tokio::test]
async fn download_rejects_missing_and_unsafe_names() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state(&Collaborators::offline(), dir.path()));

    let res = router
        .clone()
        .oneshot(Request::get("/download/nope.mp3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await["error"]["message"], "not found: File not found");

    let res = router
        .oneshot(Request::get("/download/..%2Fsecret").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
