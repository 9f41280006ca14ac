//! Run one request with a given config; does not read .env, returns final state.
//!
//! Builds the collaborators with carepath's
//! [`build_collaborators`](carepath::build_collaborators), compiles the workflow graph and
//! runs it.

use std::sync::Arc;

use carepath::{
    build_collaborators, Collaborators, ConsultState, ConsultationGraph, NodeMiddleware,
};

use crate::config::RunConfig;
use crate::middleware::LoggingMiddleware;

use super::Error;

/// Run one request with the given config; does not read .env, returns final state.
pub async fn run_with_config(config: &RunConfig, request: ConsultState) -> Result<ConsultState, Error> {
    let collaborators = build_collaborators(&config.setup).await?;
    run_with_collaborators(config, &collaborators, request).await
}

/// Compiles the configured workflow over `collaborators` and runs `request`.
///
/// Used by [`run_with_config`] and by tests that inject mocks.
pub(crate) async fn run_with_collaborators(
    config: &RunConfig,
    collaborators: &Collaborators,
    request: ConsultState,
) -> Result<ConsultState, Error> {
    let middleware: Option<Arc<dyn NodeMiddleware<ConsultState>>> = if config.verbose {
        Some(Arc::new(LoggingMiddleware))
    } else {
        None
    };
    let graph =
        ConsultationGraph::build_with_middleware(config.workflow, collaborators, middleware)?;
    tracing::debug!(workflow = config.workflow.name(), "graph compiled");
    Ok(graph.run(request).await?)
}
