//! Collaborator fixtures shared by the consultation tests.

use std::sync::Arc;

use carepath::knowledge::seed::FALLBACK_PASSAGES;
use carepath::{
    Collaborators, HashingEmbedder, InMemoryKnowledgeStore, KnowledgeStore, MockClassifier,
    MockLlm, MockPlaces, MockSpeechToText, MockTextToSpeech, MockVision, MockWebSearch, Passage,
    SearchHit,
};

/// Handles on the mocks so tests can count calls after a run.
pub struct Fixture {
    pub classifier: Arc<MockClassifier>,
    pub llm: Arc<MockLlm>,
    pub stt: Arc<MockSpeechToText>,
    pub tts: Arc<MockTextToSpeech>,
    pub vision: Arc<MockVision>,
    pub reference: Arc<InMemoryKnowledgeStore>,
    pub cache: Arc<InMemoryKnowledgeStore>,
    pub web: Arc<MockWebSearch>,
    pub places: Arc<MockPlaces>,
}

impl Fixture {
    /// Working mocks with the classifier answering `label`.
    pub fn new(label: &str) -> Self {
        let embedder = Arc::new(HashingEmbedder::default());
        Self {
            classifier: Arc::new(MockClassifier::new(label)),
            llm: Arc::new(MockLlm::new("Mock answer.")),
            stt: Arc::new(MockSpeechToText::new("spoken question")),
            tts: Arc::new(MockTextToSpeech::new("reply.mp3")),
            vision: Arc::new(MockVision::new("With what I see, I think you have a rash.")),
            reference: Arc::new(InMemoryKnowledgeStore::new(embedder.clone())),
            cache: Arc::new(InMemoryKnowledgeStore::new(embedder)),
            web: Arc::new(
                MockWebSearch::new(vec![
                    SearchHit::new("WHO malaria", "https://who.example/malaria"),
                    SearchHit::new("Bed nets video", "https://youtube.example/nets"),
                ])
                .with_page(
                    "https://who.example/malaria",
                    "Prevent malaria by sleeping under insecticide-treated bed nets.",
                ),
            ),
            places: Arc::new(MockPlaces::default()),
        }
    }

    pub async fn seed_reference(&self) {
        for text in FALLBACK_PASSAGES {
            self.reference.add(Passage::new(text)).await.unwrap();
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            classifier: self.classifier.clone(),
            llm: self.llm.clone(),
            stt: self.stt.clone(),
            tts: self.tts.clone(),
            vision: self.vision.clone(),
            reference: self.reference.clone(),
            preventive_cache: self.cache.clone(),
            web: self.web.clone(),
            places: self.places.clone(),
        }
    }
}
