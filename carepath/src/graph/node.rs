//! Graph node trait: one step in a StateGraph.
//!
//! Receives the current state by reference and returns a partial update plus a
//! [`Next`]. The graph owns nodes as `Arc<dyn Node<S>>`; nodes do not know their edges.

use async_trait::async_trait;

use crate::error::AgentError;

use super::{GraphState, Next};

/// Fields a node reads and writes.
///
/// Checked by `StateGraph::compile`: a conditional node must write the label field, and
/// every read must be guaranteed by the graph inputs or by writes on every path leading to
/// the node.
#[derive(Clone, Debug)]
pub struct NodeContract<F> {
    pub reads: Vec<F>,
    pub writes: Vec<F>,
}

impl<F> Default for NodeContract<F> {
    fn default() -> Self {
        Self {
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl<F> NodeContract<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        self.reads.extend(fields);
        self
    }

    pub fn writes(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        self.writes.extend(fields);
        self
    }
}

/// One step in a graph: state in, (partial update, next) out.
///
/// Implementations catch their own collaborator failures and return a degraded update;
/// an `Err` from `run` aborts the whole run.
///
/// **Interaction**: registered with `StateGraph::add_node`; invoked by
/// `CompiledStateGraph::run`, optionally through a `NodeMiddleware`.
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    /// Node id (e.g. `"transcribe"`, `"route"`). Unique within a graph.
    fn id(&self) -> &str;

    /// Declared inputs and outputs. Default: none.
    fn contract(&self) -> NodeContract<S::Field> {
        NodeContract::default()
    }

    /// One step: read `state`, return the fields this node produces.
    async fn run(&self, state: &S) -> Result<(S::Update, Next), AgentError>;
}
