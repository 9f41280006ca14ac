//! Builds the consultation graphs from a set of collaborators.
//!
//! Layout of the default workflow:
//!
//! ```text
//! transcribe -> route => symptom    (triage => vision_consult | knowledge_consult)
//!                     => preventive (screen -> guidance -> media -> voice)
//!                     => general -> voice
//! ```
//!
//! The hospital variant is `transcribe -> hospitals -> voice`.

use std::sync::Arc;

use crate::error::{AgentError, CollaboratorError};
use crate::graph::{
    CompilationError, CompiledStateGraph, NodeMiddleware, RunOutcome, StateGraph, SubgraphNode,
    END, START,
};
use crate::knowledge::{HashingEmbedder, InMemoryKnowledgeStore, KnowledgeStore};
use crate::llm::{Classifier, LlmClient, MockClassifier, MockLlm};
use crate::speech::{MockSpeechToText, MockTextToSpeech, SpeechToText, TextToSpeech};
use crate::vision::{MockVision, VisionAnalyzer};
use crate::web::{MockPlaces, MockWebSearch, PlacesSearch, WebSearch};

use super::nodes::{
    GeneralNode, GuidanceNode, HospitalLookupNode, IntentRouterNode, KnowledgeNode, MediaNode,
    ScreenNode, TranscribeNode, TriageNode, VisionNode, VoiceNode,
};
use super::state::{ConsultState, Evidence, Intent, RouteLabel};

pub const SYMPTOM: &str = "symptom";
pub const PREVENTIVE: &str = "preventive";
pub const VISION: &str = "vision";
pub const KNOWLEDGE: &str = "knowledge";

type Middleware = Option<Arc<dyn NodeMiddleware<ConsultState>>>;

/// External services the nodes call, built once at startup and shared by every run.
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn Classifier>,
    pub llm: Arc<dyn LlmClient>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub vision: Arc<dyn VisionAnalyzer>,
    /// Reference knowledge for the symptom branch.
    pub reference: Arc<dyn KnowledgeStore>,
    /// Scraped prevention pages, filled on cache misses.
    pub preventive_cache: Arc<dyn KnowledgeStore>,
    pub web: Arc<dyn WebSearch>,
    pub places: Arc<dyn PlacesSearch>,
}

impl Collaborators {
    /// Mock collaborators that need no network: a canned LLM, a classifier that always says
    /// "general", empty stores and search results. Transcription, synthesis and vision fail
    /// with a configuration error, so runs degrade to text-only answers.
    pub fn offline() -> Self {
        let embedder = Arc::new(HashingEmbedder::default());
        let unconfigured = |what: &str| CollaboratorError::Config(format!("no {} configured", what));
        Self {
            classifier: Arc::new(MockClassifier::default()),
            llm: Arc::new(MockLlm::default()),
            stt: Arc::new(MockSpeechToText::failing(unconfigured("speech-to-text"))),
            tts: Arc::new(MockTextToSpeech::failing(unconfigured("text-to-speech"))),
            vision: Arc::new(MockVision::failing(unconfigured("vision model"))),
            reference: Arc::new(InMemoryKnowledgeStore::new(embedder.clone())),
            preventive_cache: Arc::new(InMemoryKnowledgeStore::new(embedder)),
            web: Arc::new(MockWebSearch::default()),
            places: Arc::new(MockPlaces::default()),
        }
    }
}

fn graph(name: &str, nested: bool, middleware: &Middleware) -> StateGraph<ConsultState> {
    let graph = if nested {
        StateGraph::nested(name)
    } else {
        StateGraph::new(name)
    };
    match middleware {
        Some(m) => graph.with_middleware(m.clone()),
        None => graph,
    }
}

/// `analyze_image -> voice`.
pub fn build_vision_consult(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let mut g = graph("vision_consult", true, middleware);
    g.add_node(VisionNode::ID, Arc::new(VisionNode::new(c.vision.clone())))
        .add_node(VoiceNode::ID, Arc::new(VoiceNode::new(c.tts.clone())))
        .add_edge(START, VisionNode::ID)
        .add_edge(VisionNode::ID, VoiceNode::ID)
        .add_edge(VoiceNode::ID, END);
    g.compile()
}

/// `query_knowledge -> voice`.
pub fn build_knowledge_consult(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let mut g = graph("knowledge_consult", true, middleware);
    g.add_node(
        KnowledgeNode::ID,
        Arc::new(KnowledgeNode::new(c.reference.clone(), c.llm.clone())),
    )
    .add_node(VoiceNode::ID, Arc::new(VoiceNode::new(c.tts.clone())))
    .add_edge(START, KnowledgeNode::ID)
    .add_edge(KnowledgeNode::ID, VoiceNode::ID)
    .add_edge(VoiceNode::ID, END);
    g.compile()
}

/// `triage` picks the vision path when an image is attached, the knowledge path otherwise.
pub fn build_symptom(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let vision = SubgraphNode::new(VISION, build_vision_consult(c, middleware)?);
    let knowledge = SubgraphNode::new(KNOWLEDGE, build_knowledge_consult(c, middleware)?);
    let mut g = graph(SYMPTOM, true, middleware);
    g.add_node(TriageNode::ID, Arc::new(TriageNode))
        .add_node(VISION, Arc::new(vision))
        .add_node(KNOWLEDGE, Arc::new(knowledge))
        .add_edge(START, TriageNode::ID)
        .add_conditional_edges(
            TriageNode::ID,
            [
                (RouteLabel::Evidence(Evidence::HasImage), VISION),
                (RouteLabel::Evidence(Evidence::TextOnly), KNOWLEDGE),
            ],
            Some(KNOWLEDGE),
        )
        .add_edge(VISION, END)
        .add_edge(KNOWLEDGE, END);
    g.compile()
}

/// `screen -> guidance -> media -> voice`.
pub fn build_preventive(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let guidance = GuidanceNode::new(c.llm.clone(), c.preventive_cache.clone(), c.web.clone());
    let mut g = graph(PREVENTIVE, true, middleware);
    g.add_node(ScreenNode::ID, Arc::new(ScreenNode))
        .add_node(GuidanceNode::ID, Arc::new(guidance))
        .add_node(MediaNode::ID, Arc::new(MediaNode::new(c.web.clone())))
        .add_node(VoiceNode::ID, Arc::new(VoiceNode::new(c.tts.clone())))
        .add_edge(START, ScreenNode::ID)
        .add_edge(ScreenNode::ID, GuidanceNode::ID)
        .add_edge(GuidanceNode::ID, MediaNode::ID)
        .add_edge(MediaNode::ID, VoiceNode::ID)
        .add_edge(VoiceNode::ID, END);
    g.compile()
}

/// The default workflow: transcribe, classify, dispatch to one branch.
pub fn build_consultation(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let symptom = SubgraphNode::new(SYMPTOM, build_symptom(c, middleware)?);
    let preventive = SubgraphNode::new(PREVENTIVE, build_preventive(c, middleware)?);
    let mut g = graph("consultation", false, middleware);
    g.add_node(TranscribeNode::ID, Arc::new(TranscribeNode::new(c.stt.clone())))
        .add_node(
            IntentRouterNode::ID,
            Arc::new(IntentRouterNode::new(c.classifier.clone())),
        )
        .add_node(SYMPTOM, Arc::new(symptom))
        .add_node(PREVENTIVE, Arc::new(preventive))
        .add_node(GeneralNode::ID, Arc::new(GeneralNode::new(c.llm.clone())))
        .add_node(VoiceNode::ID, Arc::new(VoiceNode::new(c.tts.clone())))
        .add_edge(START, TranscribeNode::ID)
        .add_edge(TranscribeNode::ID, IntentRouterNode::ID)
        .add_conditional_edges(
            IntentRouterNode::ID,
            [
                (RouteLabel::Intent(Intent::Symptom), SYMPTOM),
                (RouteLabel::Intent(Intent::Preventive), PREVENTIVE),
                (RouteLabel::Intent(Intent::General), GeneralNode::ID),
            ],
            Some(GeneralNode::ID),
        )
        .add_edge(SYMPTOM, END)
        .add_edge(PREVENTIVE, END)
        .add_edge(GeneralNode::ID, VoiceNode::ID)
        .add_edge(VoiceNode::ID, END);
    g.compile()
}

/// The hospital variant: `transcribe -> hospitals -> voice`.
pub fn build_hospitals(
    c: &Collaborators,
    middleware: &Middleware,
) -> Result<CompiledStateGraph<ConsultState>, CompilationError> {
    let mut g = graph("hospitals", false, middleware);
    g.add_node(TranscribeNode::ID, Arc::new(TranscribeNode::new(c.stt.clone())))
        .add_node(
            HospitalLookupNode::ID,
            Arc::new(HospitalLookupNode::new(c.places.clone())),
        )
        .add_node(VoiceNode::ID, Arc::new(VoiceNode::new(c.tts.clone())))
        .add_edge(START, TranscribeNode::ID)
        .add_edge(TranscribeNode::ID, HospitalLookupNode::ID)
        .add_edge(HospitalLookupNode::ID, VoiceNode::ID)
        .add_edge(VoiceNode::ID, END);
    g.compile()
}

/// Which top-level graph to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Workflow {
    #[default]
    Consultation,
    Hospitals,
}

impl Workflow {
    pub fn name(self) -> &'static str {
        match self {
            Workflow::Consultation => "consultation",
            Workflow::Hospitals => "hospitals",
        }
    }
}

/// A compiled top-level workflow, cheap to clone and shared across concurrent requests.
///
/// Each [`run`](Self::run) owns its state; the graph itself is read-only.
#[derive(Clone)]
pub struct ConsultationGraph {
    workflow: Workflow,
    graph: Arc<CompiledStateGraph<ConsultState>>,
}

impl ConsultationGraph {
    pub fn build(workflow: Workflow, collaborators: &Collaborators) -> Result<Self, CompilationError> {
        Self::build_with_middleware(workflow, collaborators, None)
    }

    /// Like [`build`](Self::build), with `middleware` wrapping every node of every
    /// (sub-)graph.
    pub fn build_with_middleware(
        workflow: Workflow,
        collaborators: &Collaborators,
        middleware: Middleware,
    ) -> Result<Self, CompilationError> {
        let graph = match workflow {
            Workflow::Consultation => build_consultation(collaborators, &middleware)?,
            Workflow::Hospitals => build_hospitals(collaborators, &middleware)?,
        };
        Ok(Self {
            workflow,
            graph: Arc::new(graph),
        })
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn compiled(&self) -> &CompiledStateGraph<ConsultState> {
        &self.graph
    }

    /// Runs one request to completion (or to a clarification halt) and returns the final
    /// state.
    pub async fn run(&self, state: ConsultState) -> Result<ConsultState, AgentError> {
        self.graph.invoke(state).await
    }

    /// Like [`run`](Self::run), also reporting how the run ended.
    pub async fn run_outcome(
        &self,
        state: ConsultState,
    ) -> Result<RunOutcome<ConsultState>, AgentError> {
        self.graph.run(state).await
    }
}
