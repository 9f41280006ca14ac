//! Nodes of the consultation graphs.
//!
//! Every node catches its own collaborator failures, logs them with `tracing::warn!` and
//! returns a degraded update; `run` only fails on bugs.

mod general;
mod hospitals;
mod preventive;
mod router;
mod symptom;
mod transcribe;
mod voice;

pub use general::GeneralNode;
pub use hospitals::HospitalLookupNode;
pub use preventive::{GuidanceNode, MediaNode, ScreenNode};
pub use router::{IntentRouterNode, TriageNode};
pub use symptom::{KnowledgeNode, VisionNode};
pub use transcribe::TranscribeNode;
pub use voice::VoiceNode;

/// Number of passages retrieved per query.
pub const RETRIEVAL_K: usize = 3;
