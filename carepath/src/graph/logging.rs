//! Structured logging for graph execution.
//!
//! Graph and node lifecycle events go through `tracing`; the subscriber is installed by the
//! binaries (see `carepath-cli`).

use std::fmt::Debug;

use crate::error::AgentError;
use crate::graph::Next;

pub fn log_node_start(graph: &str, node_id: &str) {
    tracing::debug!(graph, node_id, "starting node execution");
}

/// Logs the update a node produced and where it asked to go next.
pub fn log_node_complete<U: Debug>(graph: &str, node_id: &str, update: &U, next: Next) {
    tracing::debug!(graph, node_id, ?next, ?update, "node execution complete");
}

pub fn log_node_halt(graph: &str, node_id: &str) {
    tracing::info!(graph, node_id, "node ended the run");
}

pub fn log_graph_start(graph: &str) {
    tracing::info!(graph, "starting graph execution");
}

pub fn log_graph_complete(graph: &str, steps: usize) {
    tracing::info!(graph, steps, "graph execution complete");
}

pub fn log_graph_error(graph: &str, error: &AgentError) {
    tracing::error!(graph, %error, "graph execution error");
}
