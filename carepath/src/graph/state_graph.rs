//! State graph: nodes + explicit edges (fixed or conditional).
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` and
//! `add_conditional_edges(from, routes, default)` using `START` and `END` for graph
//! entry/exit, then `compile` to get a `CompiledStateGraph`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::edge::Edge;
use crate::graph::node::{Node, NodeContract};
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::GraphState;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph under construction.
///
/// Generic over state type `S`. Every node needs exactly one outgoing edge definition:
/// a fixed successor, `END`, or a conditional route table keyed by `S::Label`.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S: GraphState> {
    name: String,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Targets of edges from START.
    entries: Vec<String>,
    /// Outgoing edge per source node, in insertion order.
    edges: Vec<(String, Edge<S::Label>)>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    /// When true, reads not satisfied inside the graph are left for the enclosing graph.
    nested: bool,
}

impl<S: GraphState> StateGraph<S> {
    /// Creates an empty top-level graph. Reads must be satisfied by `S::input_fields()` or
    /// by upstream writes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: HashMap::new(),
            entries: Vec::new(),
            edges: Vec::new(),
            middleware: None,
            nested: false,
        }
    }

    /// Creates an empty graph meant to run inside a `SubgraphNode`. Reads it cannot satisfy
    /// itself are reported by `CompiledStateGraph::requires` and checked by the parent.
    pub fn nested(name: impl Into<String>) -> Self {
        Self {
            nested: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches node middleware; the compiled graph wraps each node call with it.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Adds a node; replaces any node with the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds a fixed edge. `START` as `from_id` marks the entry; `END` as `to_id` marks the
    /// node as terminal.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        let from = from_id.into();
        let to = to_id.into();
        if from == START {
            self.entries.push(to);
        } else if to == END {
            self.edges.push((from, Edge::End));
        } else {
            self.edges.push((from, Edge::Fixed(to)));
        }
        self
    }

    /// Adds a conditional edge: after `from_id` runs, the executor takes the route label
    /// from the state and continues with `routes[label]`, or `default` when the label is
    /// absent or unmapped. Without a default, an unmapped label fails the run.
    pub fn add_conditional_edges<I, T>(
        &mut self,
        from_id: impl Into<String>,
        routes: I,
        default: Option<&str>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (S::Label, T)>,
        T: Into<String>,
    {
        let routes = routes.into_iter().map(|(l, t)| (l, t.into())).collect();
        self.edges.push((
            from_id.into(),
            Edge::Conditional {
                routes,
                default: default.map(ToString::to_string),
            },
        ));
        self
    }

    /// Validates the definition and builds the executable graph.
    ///
    /// Checks, in order: one entry, known node ids, one outgoing edge per node, no cycles,
    /// every node reachable, END reachable, conditional nodes write the label field, and
    /// every read is guaranteed on all paths (top-level graphs only; nested graphs report
    /// their external reads instead).
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        if self.entries.len() != 1 {
            return Err(CompilationError::MissingStart);
        }
        let entry = self.entries[0].clone();
        if !self.nodes.contains_key(&entry) {
            return Err(CompilationError::NodeNotFound(entry));
        }

        let mut edges: HashMap<String, Edge<S::Label>> = HashMap::new();
        for (from, edge) in self.edges {
            if !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if let Some(missing) = edge.targets().into_iter().find(|t| !self.nodes.contains_key(*t)) {
                return Err(CompilationError::NodeNotFound(missing.to_string()));
            }
            if edges.contains_key(&from) {
                return Err(CompilationError::DuplicateEdge(from));
            }
            edges.insert(from, edge);
        }

        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();
        if let Some(id) = ids.iter().find(|id| !edges.contains_key(id.as_str())) {
            return Err(CompilationError::MissingEdge((*id).clone()));
        }

        let order = topological_order(&entry, &edges)?;
        if let Some(id) = ids.iter().find(|id| !order.contains(&id.as_str())) {
            return Err(CompilationError::Unreachable((*id).clone()));
        }
        if !order.iter().any(|id| matches!(edges[*id], Edge::End)) {
            return Err(CompilationError::MissingEnd);
        }

        let contracts: HashMap<&str, NodeContract<S::Field>> = order
            .iter()
            .map(|id| (*id, self.nodes[*id].contract()))
            .collect();

        for id in &order {
            if matches!(edges[*id], Edge::Conditional { .. })
                && !contracts[id].writes.contains(&S::LABEL_FIELD)
            {
                return Err(CompilationError::LabelNotProduced(id.to_string()));
            }
        }

        let flow = analyze_fields::<S>(&order, &edges, &contracts);
        if !self.nested {
            let inputs = S::input_fields();
            if let Some((node, field)) = flow.external_reads.iter().find(|(_, f)| !inputs.contains(f)) {
                return Err(CompilationError::UnsatisfiedRead {
                    node: node.to_string(),
                    field: format!("{:?}", field),
                });
            }
        }
        let requires = unique(flow.external_reads.iter().map(|(_, f)| *f));
        let provides = flow.provided.into_iter().collect();

        Ok(CompiledStateGraph {
            name: self.name,
            nodes: self.nodes,
            edges,
            entry,
            middleware: self.middleware,
            requires,
            provides,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

/// Depth-first topological sort from `entry`; fails on the first back edge.
fn topological_order<'a, L>(
    entry: &'a str,
    edges: &'a HashMap<String, Edge<L>>,
) -> Result<Vec<&'a str>, CompilationError> {
    fn visit<'a, L>(
        node: &'a str,
        edges: &'a HashMap<String, Edge<L>>,
        marks: &mut HashMap<&'a str, Mark>,
        out: &mut Vec<&'a str>,
    ) -> Result<(), CompilationError> {
        match marks.get(node) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Active) => return Err(CompilationError::CycleDetected(node.to_string())),
            None => {}
        }
        marks.insert(node, Mark::Active);
        if let Some(edge) = edges.get(node) {
            for target in edge.targets() {
                visit(target, edges, marks, out)?;
            }
        }
        marks.insert(node, Mark::Done);
        out.push(node);
        Ok(())
    }

    let mut marks = HashMap::new();
    let mut out = Vec::new();
    visit(entry, edges, &mut marks, &mut out)?;
    out.reverse();
    Ok(out)
}

struct FieldFlow<'a, F> {
    /// Reads not guaranteed by writes upstream, with the reading node.
    external_reads: Vec<(&'a str, F)>,
    /// Fields written on every path that reaches END.
    provided: HashSet<F>,
}

/// Forward must-analysis over the DAG: a field is available at a node when every path from
/// the entry to it writes the field. The route label is consumed by the edge that reads it.
fn analyze_fields<'a, S: GraphState>(
    order: &[&'a str],
    edges: &'a HashMap<String, Edge<S::Label>>,
    contracts: &HashMap<&'a str, NodeContract<S::Field>>,
) -> FieldFlow<'a, S::Field> {
    let mut available: HashMap<&str, HashSet<S::Field>> = HashMap::new();
    let mut external_reads = Vec::new();
    let mut provided: Option<HashSet<S::Field>> = None;

    for id in order {
        let contract = &contracts[id];
        let avail = available.get(id).cloned().unwrap_or_default();
        for field in &contract.reads {
            if !avail.contains(field) {
                external_reads.push((*id, *field));
            }
        }
        let mut out = avail;
        out.extend(contract.writes.iter().copied());

        let edge = &edges[*id];
        match edge {
            Edge::End => {
                out.remove(&S::LABEL_FIELD);
                provided = Some(match provided {
                    None => out.clone(),
                    Some(p) => p.intersection(&out).copied().collect(),
                });
            }
            Edge::Conditional { .. } => {
                out.remove(&S::LABEL_FIELD);
            }
            Edge::Fixed(_) => {}
        }
        for target in edge.targets() {
            match available.get_mut(target) {
                Some(set) => set.retain(|f| out.contains(f)),
                None => {
                    available.insert(target, out.clone());
                }
            }
        }
    }

    FieldFlow {
        external_reads,
        provided: provided.unwrap_or_default(),
    }
}

fn unique<F: PartialEq>(fields: impl Iterator<Item = F>) -> Vec<F> {
    let mut out = Vec::new();
    for f in fields {
        if !out.contains(&f) {
            out.push(f);
        }
    }
    out
}
