//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the node/edge definition is not an acyclic graph
//! with one entry and a reachable END, or when a node contract cannot be satisfied.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge from START, or more than one.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// No node leads to END.
    #[error("graph has no path to END")]
    MissingEnd,

    /// A registered node has no outgoing edge.
    #[error("node has no outgoing edge: {0}")]
    MissingEdge(String),

    /// A node has more than one outgoing edge definition.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A registered node cannot be reached from START.
    #[error("node is unreachable from START: {0}")]
    Unreachable(String),

    /// Edges form a cycle through the named node.
    #[error("cycle detected at node: {0}")]
    CycleDetected(String),

    /// A node with conditional edges does not declare the route label among its writes.
    #[error("conditional node '{0}' does not produce the route label")]
    LabelNotProduced(String),

    /// A node reads a field that is neither a graph input nor written on every path to it.
    #[error("node '{node}' reads {field}, which no path to it guarantees")]
    UnsatisfiedRead { node: String, field: String },
}
