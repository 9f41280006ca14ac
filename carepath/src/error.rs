//! Error types for graph execution and collaborator calls.
//!
//! [`AgentError`] is what `CompiledStateGraph::run` surfaces to the caller: structural
//! failures of the workflow itself. [`CollaboratorError`] is what external services return;
//! nodes downgrade it into a degraded state update and never let it escape.

use thiserror::Error;

/// Graph execution error.
///
/// Only structural problems end a run with an error: an edge that cannot be resolved, a
/// cycle that slipped past compilation, or a node id the graph does not know. Collaborator
/// failures never show up here.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. empty graph).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A conditional edge had no route for the label and no default successor.
    #[error("graph '{graph}': node '{node}' has no successor for label {label:?} and no default")]
    UnresolvedEdge {
        graph: String,
        node: String,
        label: Option<String>,
    },

    /// The run exceeded `|nodes| + 1` steps.
    #[error("graph '{graph}': exceeded {limit} steps, the graph contains a cycle")]
    GraphCycle { graph: String, limit: usize },

    /// The executor was asked to run a node id that is not registered.
    #[error("graph '{graph}': node not found: {node}")]
    NodeNotFound { graph: String, node: String },
}

impl AgentError {
    /// True for errors caused by a misconfigured graph rather than a node body.
    pub fn is_structural(&self) -> bool {
        !matches!(self, AgentError::ExecutionFailed(_))
    }
}

/// Failure reported by an external collaborator (speech, vision, completion, search, ...).
///
/// Returned by the collaborator traits. Nodes catch it, log it and produce a degraded
/// partial update instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("completion failed: {0}")]
    Completion(String),

    #[error("classification failed: {0}")]
    Classification(String),

    #[error("vision analysis failed: {0}")]
    Vision(String),

    #[error("knowledge retrieval failed: {0}")]
    Retrieval(String),

    #[error("web search failed: {0}")]
    Search(String),

    #[error("places lookup failed: {0}")]
    Places(String),

    /// Collaborator is not configured (missing API key, bad base URL).
    #[error("collaborator not configured: {0}")]
    Config(String),
}
