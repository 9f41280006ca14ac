//! Logging middleware that traces node enter/exit around each node.run call.

use async_trait::async_trait;

use carepath::{AgentError, ConsultState, Next, Node, NodeMiddleware, StateUpdate};

/// Middleware that logs node enter/exit around each node.run call, sub-graph nodes included.
///
/// Logs through `tracing` so output goes wherever the subscriber writes (stderr for the CLI).
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware<ConsultState> for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: &ConsultState,
        node: &dyn Node<ConsultState>,
    ) -> Result<(StateUpdate, Next), AgentError> {
        tracing::info!(node = node_id, "enter");
        let result = node.run(state).await;
        match &result {
            Ok((update, next)) => {
                tracing::info!(node = node_id, ?next, changed = !update.is_empty(), "exit")
            }
            Err(e) => tracing::warn!(node = node_id, error = %e, "exit with error"),
        }
        result
    }
}
