//! # carepath
//!
//! A voice-and-image medical consultation assistant built on a small state-graph engine.
//!
//! One [`ConsultState`] flows through the nodes of a compiled graph. Each node reads the
//! state, calls its collaborator (transcription, classification, vision, retrieval, web
//! search, completion, speech synthesis) and returns a partial [`StateUpdate`] that the
//! executor merges. Conditional edges route on a label written by router nodes; branches
//! are compiled sub-graphs embedded as nodes.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`, `SubgraphNode`.
//! - [`consult`]: `ConsultState`, the consultation nodes and `ConsultationGraph`.
//! - [`llm`], [`speech`], [`vision`], [`knowledge`], [`web`]: collaborator traits with mock
//!   and real implementations.
//! - [`setup`]: builds the collaborators from keys and paths, seeding the knowledge store.
//!
//! ## Features
//!
//! - `sqlite` (default): `SqliteKnowledgeStore`.
//! - `openai`: `ChatOpenAI` completion client and `OpenAIEmbedder` via `async-openai`.
//! - `remote`: Whisper transcription, OpenAI-compatible vision, ElevenLabs speech and
//!   Serper search over `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carepath::{Collaborators, ConsultState, ConsultationGraph, Workflow};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let graph = ConsultationGraph::build(Workflow::Consultation, &Collaborators::offline()).unwrap();
//! let out = graph.run(ConsultState::from_text("what is a healthy diet")).await.unwrap();
//! println!("{}", out.response_text.unwrap_or_default());
//! # }
//! ```

pub mod consult;
pub mod error;
pub mod graph;
pub mod knowledge;
pub mod llm;
pub mod media;
pub mod setup;
pub mod speech;
pub mod vision;
pub mod web;

#[cfg(feature = "remote")]
mod http;

pub use consult::{Collaborators, ConsultState, ConsultationGraph, StateUpdate, Workflow};
pub use error::{AgentError, CollaboratorError};
pub use graph::{
    CompilationError, CompiledStateGraph, Completion, Next, Node, NodeContract, NodeMiddleware,
    RunOutcome, StateGraph, SubgraphNode,
};
pub use knowledge::{Embedder, HashingEmbedder, InMemoryKnowledgeStore, KnowledgeStore, Passage};
#[cfg(feature = "openai")]
pub use knowledge::OpenAIEmbedder;
#[cfg(feature = "sqlite")]
pub use knowledge::SqliteKnowledgeStore;
pub use llm::{Classifier, LlmClassifier, LlmClient, MockClassifier, MockLlm};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use media::{GeoPoint, MediaHandle};
pub use setup::{build_collaborators, SetupConfig};
pub use speech::{MockSpeechToText, MockTextToSpeech, SpeechToText, TextToSpeech};
pub use vision::{MockVision, VisionAnalyzer};
pub use web::{MockPlaces, MockWebSearch, Place, PlacesSearch, SearchHit, WebSearch};
