//! State graph: nodes + fixed and conditional edges, compile and run.
//!
//! Add nodes and edges to a [`StateGraph`], compile it (structure and field contracts are
//! validated), then run the [`CompiledStateGraph`] with an initial state. A compiled graph
//! can itself be used as a node through [`SubgraphNode`].

mod compile_error;
mod compiled;
mod edge;
mod logging;
mod next;
mod node;
mod node_middleware;
mod state;
mod state_graph;
mod subgraph;

#[cfg(test)]
pub(crate) mod test_support;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, Completion, RunOutcome};
pub use edge::{Edge, NodeKind};
pub use next::Next;
pub use node::{Node, NodeContract};
pub use node_middleware::NodeMiddleware;
pub use state::GraphState;
pub use state_graph::{StateGraph, END, START};
pub use subgraph::SubgraphNode;
