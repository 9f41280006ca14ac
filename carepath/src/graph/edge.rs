//! Outgoing edge of a node and the node kind derived from it.

use std::collections::HashMap;

/// Successor rule for one node.
#[derive(Clone, Debug)]
pub enum Edge<L> {
    /// Terminal: the run finishes after this node.
    End,
    /// Always continue with the named node.
    Fixed(String),
    /// Continue with `routes[label]`, falling back to `default`.
    Conditional {
        routes: HashMap<L, String>,
        default: Option<String>,
    },
}

/// Kind of a node as declared by its outgoing edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Terminal,
    FixedEdge,
    ConditionalEdge,
}

impl<L> Edge<L> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Edge::End => NodeKind::Terminal,
            Edge::Fixed(_) => NodeKind::FixedEdge,
            Edge::Conditional { .. } => NodeKind::ConditionalEdge,
        }
    }

    /// Node ids this edge can lead to (END excluded).
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Edge::End => vec![],
            Edge::Fixed(to) => vec![to.as_str()],
            Edge::Conditional { routes, default } => {
                let mut out: Vec<&str> = routes.values().map(String::as_str).collect();
                if let Some(d) = default {
                    out.push(d.as_str());
                }
                out.sort_unstable();
                out.dedup();
                out
            }
        }
    }
}
