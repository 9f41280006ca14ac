//! Compiled state graph: immutable, supports run/invoke only.
//!
//! Built by `StateGraph::compile`. Holds the nodes, one resolved edge per node, the entry
//! id and optional middleware. Execution is sequential: each node sees the state merged
//! from every node before it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;

use super::edge::{Edge, NodeKind};
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_halt,
    log_node_start,
};
use super::node_middleware::NodeMiddleware;
use super::{GraphState, Next, Node};

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// A terminal node's edge to END was followed.
    Finished,
    /// A node returned `Next::End`.
    Halted { node: String },
}

/// Final state of a run plus how it ended.
#[derive(Clone, Debug)]
pub struct RunOutcome<S> {
    pub state: S,
    pub completion: Completion,
    /// Number of node executions.
    pub steps: usize,
}

/// Compiled graph: immutable structure, supports run and invoke.
///
/// Safe to share across concurrent runs (`Arc<CompiledStateGraph<S>>`); each run owns its
/// own state.
pub struct CompiledStateGraph<S: GraphState> {
    pub(super) name: String,
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) edges: HashMap<String, Edge<S::Label>>,
    pub(super) entry: String,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    /// Fields read by nodes but not written upstream inside this graph.
    pub(super) requires: Vec<S::Field>,
    /// Fields written on every path to END.
    pub(super) provides: Vec<S::Field>,
}

impl<S: GraphState> CompiledStateGraph<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Kind of the node with `id`, derived from its outgoing edge.
    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        self.edges.get(id).map(Edge::kind)
    }

    /// Registered node ids, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn requires(&self) -> &[S::Field] {
        &self.requires
    }

    pub fn provides(&self) -> &[S::Field] {
        &self.provides
    }

    /// Runs the graph and returns only the final state.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        self.run(state).await.map(|outcome| outcome.state)
    }

    /// Runs the graph from the entry node.
    ///
    /// After each node: merge its update; stop if it returned `Next::End`; otherwise follow
    /// its edge. Conditional edges consume the route label from the state. The run is capped
    /// at `|nodes| + 1` steps.
    pub async fn run(&self, state: S) -> Result<RunOutcome<S>, AgentError> {
        log_graph_start(&self.name);
        let result = self.run_loop(state).await;
        match &result {
            Ok(outcome) => log_graph_complete(&self.name, outcome.steps),
            Err(e) => log_graph_error(&self.name, e),
        }
        result
    }

    async fn run_loop(&self, mut state: S) -> Result<RunOutcome<S>, AgentError> {
        if self.nodes.is_empty() {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let limit = self.nodes.len() + 1;
        let mut current = self.entry.clone();
        let mut steps = 0;

        loop {
            if steps >= limit {
                return Err(AgentError::GraphCycle {
                    graph: self.name.clone(),
                    limit,
                });
            }
            steps += 1;

            let node = self
                .nodes
                .get(&current)
                .cloned()
                .ok_or_else(|| AgentError::NodeNotFound {
                    graph: self.name.clone(),
                    node: current.clone(),
                })?;

            log_node_start(&self.name, &current);
            let (update, next) = match &self.middleware {
                Some(middleware) => middleware.around_run(&current, &state, node.as_ref()).await?,
                None => node.run(&state).await?,
            };
            log_node_complete(&self.name, &current, &update, next);
            state.merge(update);

            if next == Next::End {
                log_node_halt(&self.name, &current);
                return Ok(RunOutcome {
                    state,
                    completion: Completion::Halted { node: current },
                    steps,
                });
            }

            current = match self.edges.get(&current) {
                Some(Edge::End) => {
                    return Ok(RunOutcome {
                        state,
                        completion: Completion::Finished,
                        steps,
                    })
                }
                Some(Edge::Fixed(to)) => to.clone(),
                Some(Edge::Conditional { routes, default }) => {
                    let label = state.take_route_label();
                    match label.and_then(|l| routes.get(&l)).or(default.as_ref()) {
                        Some(to) => to.clone(),
                        None => {
                            return Err(AgentError::UnresolvedEdge {
                                graph: self.name.clone(),
                                node: current,
                                label: label.map(|l| format!("{:?}", l)),
                            })
                        }
                    }
                }
                None => {
                    return Err(AgentError::UnresolvedEdge {
                        graph: self.name.clone(),
                        node: current,
                        label: None,
                    })
                }
            };
        }
    }
}
