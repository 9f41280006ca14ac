//! Runs a compiled graph as a single node of an enclosing graph.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;

use super::compiled::{Completion, CompiledStateGraph};
use super::node::NodeContract;
use super::{GraphState, Next, Node};

/// Node that delegates to a nested [`CompiledStateGraph`] over the same state type.
///
/// The nested run starts from a copy of the parent state; its net effect is returned as one
/// update (`GraphState::diff`). When a node inside halts the run, the halt propagates: this
/// node returns `Next::End` and the parent stops too.
///
/// The contract is the nested graph's interface: it reads `requires()` and writes
/// `provides()`, so the parent checks the nested graph's inputs at its own compile time.
pub struct SubgraphNode<S: GraphState> {
    id: String,
    graph: Arc<CompiledStateGraph<S>>,
}

impl<S: GraphState> SubgraphNode<S> {
    pub fn new(id: impl Into<String>, graph: CompiledStateGraph<S>) -> Self {
        Self {
            id: id.into(),
            graph: Arc::new(graph),
        }
    }

    pub fn graph(&self) -> &CompiledStateGraph<S> {
        &self.graph
    }
}

#[async_trait]
impl<S: GraphState> Node<S> for SubgraphNode<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn contract(&self) -> NodeContract<S::Field> {
        NodeContract::new()
            .reads(self.graph.requires().iter().copied())
            .writes(self.graph.provides().iter().copied())
    }

    async fn run(&self, state: &S) -> Result<(S::Update, Next), AgentError> {
        let outcome = self.graph.run(state.clone()).await?;
        let next = match outcome.completion {
            Completion::Finished => Next::Continue,
            Completion::Halted { .. } => Next::End,
        };
        Ok((state.diff(&outcome.state), next))
    }
}
