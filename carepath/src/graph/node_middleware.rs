//! Node middleware: wraps every node call of a compiled graph.

use async_trait::async_trait;

use crate::error::AgentError;

use super::{GraphState, Next, Node};

/// Around-advice for node execution (logging, timing, tracing spans).
///
/// Implementations must call `node.run(state)` exactly once and return its result,
/// possibly after inspecting it.
#[async_trait]
pub trait NodeMiddleware<S: GraphState>: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        state: &S,
        node: &dyn Node<S>,
    ) -> Result<(S::Update, Next), AgentError>;
}
