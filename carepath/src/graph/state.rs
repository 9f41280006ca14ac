//! State contract required by the graph executor.
//!
//! A graph is generic over one state type. Nodes never return a full state; they return
//! `Self::Update`, the minimal set of fields they produce, and the executor merges it.

use std::fmt::Debug;
use std::hash::Hash;

/// State threaded through a graph run.
///
/// **Interaction**: `CompiledStateGraph::run` calls [`merge`](GraphState::merge) after each
/// node and [`take_route_label`](GraphState::take_route_label) when resolving a conditional
/// edge. `SubgraphNode` uses [`diff`](GraphState::diff) to turn a nested run into one update.
pub trait GraphState: Clone + Send + Sync + Debug + 'static {
    /// Partial state produced by one node. `Default` must be the empty update.
    type Update: Default + Send + Debug;
    /// Names of the state's fields; node contracts are expressed over it.
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;
    /// Closed set of labels a router node can write.
    type Label: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Field that carries the routing label.
    const LABEL_FIELD: Self::Field;

    /// Fields the caller may populate before the run starts.
    fn input_fields() -> &'static [Self::Field];

    /// Applies every field present in `update`; absent fields are untouched.
    fn merge(&mut self, update: Self::Update);

    /// Minimal update that turns `self` into `newer`.
    fn diff(&self, newer: &Self) -> Self::Update;

    /// Removes and returns the routing label.
    fn take_route_label(&mut self) -> Option<Self::Label>;
}
