//! Small state and nodes for exercising the graph engine in unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;

use super::node::NodeContract;
use super::{GraphState, Next, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    Left,
    Right,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TallyField {
    Total,
    Trail,
    Label,
}

/// Counter plus the ids of the nodes that ran.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tally {
    pub total: i64,
    pub trail: Vec<String>,
    pub label: Option<Branch>,
}

#[derive(Debug, Default)]
pub struct TallyUpdate {
    pub total: Option<i64>,
    pub trail: Option<Vec<String>>,
    pub label: Option<Option<Branch>>,
}

impl GraphState for Tally {
    type Update = TallyUpdate;
    type Field = TallyField;
    type Label = Branch;

    const LABEL_FIELD: TallyField = TallyField::Label;

    fn input_fields() -> &'static [TallyField] {
        &[TallyField::Total]
    }

    fn merge(&mut self, update: TallyUpdate) {
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(trail) = update.trail {
            self.trail = trail;
        }
        if let Some(label) = update.label {
            self.label = label;
        }
    }

    fn diff(&self, newer: &Self) -> TallyUpdate {
        TallyUpdate {
            total: (self.total != newer.total).then_some(newer.total),
            trail: (self.trail != newer.trail).then(|| newer.trail.clone()),
            label: (self.label != newer.label).then_some(newer.label),
        }
    }

    fn take_route_label(&mut self) -> Option<Branch> {
        self.label.take()
    }
}

fn trail_with(state: &Tally, id: &str) -> Vec<String> {
    let mut trail = state.trail.clone();
    trail.push(id.to_string());
    trail
}

/// Adds `delta` to the total and records itself in the trail.
pub struct AddNode {
    id: String,
    delta: i64,
    extra_writes: Vec<TallyField>,
    pub calls: AtomicUsize,
}

impl AddNode {
    pub fn new(id: &str, delta: i64) -> Self {
        Self {
            id: id.to_string(),
            delta,
            extra_writes: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Declares an extra written field in the contract.
    pub fn writing(mut self, field: TallyField) -> Self {
        self.extra_writes.push(field);
        self
    }
}

#[async_trait]
impl Node<Tally> for AddNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn contract(&self) -> NodeContract<TallyField> {
        NodeContract::new()
            .writes([TallyField::Total])
            .writes(self.extra_writes.iter().copied())
    }

    async fn run(&self, state: &Tally) -> Result<(TallyUpdate, Next), AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((
            TallyUpdate {
                total: Some(state.total + self.delta),
                trail: Some(trail_with(state, &self.id)),
                label: None,
            },
            Next::Continue,
        ))
    }
}

/// Writes a fixed route label.
pub struct LabelNode {
    id: String,
    label: Option<Branch>,
}

impl LabelNode {
    pub fn new(id: &str, label: Option<Branch>) -> Self {
        Self {
            id: id.to_string(),
            label,
        }
    }
}

#[async_trait]
impl Node<Tally> for LabelNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn contract(&self) -> NodeContract<TallyField> {
        NodeContract::new().writes([TallyField::Label])
    }

    async fn run(&self, state: &Tally) -> Result<(TallyUpdate, Next), AgentError> {
        Ok((
            TallyUpdate {
                trail: Some(trail_with(state, &self.id)),
                label: Some(self.label),
                ..TallyUpdate::default()
            },
            Next::Continue,
        ))
    }
}

/// Declares a read of one field and does nothing else.
pub struct ReadNode {
    id: String,
    field: TallyField,
}

impl ReadNode {
    pub fn new(id: &str, field: TallyField) -> Self {
        Self {
            id: id.to_string(),
            field,
        }
    }
}

#[async_trait]
impl Node<Tally> for ReadNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn contract(&self) -> NodeContract<TallyField> {
        NodeContract::new().reads([self.field])
    }

    async fn run(&self, _state: &Tally) -> Result<(TallyUpdate, Next), AgentError> {
        Ok((TallyUpdate::default(), Next::Continue))
    }
}

/// Records itself and halts the run.
pub struct HaltNode {
    id: String,
}

impl HaltNode {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

#[async_trait]
impl Node<Tally> for HaltNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: &Tally) -> Result<(TallyUpdate, Next), AgentError> {
        Ok((
            TallyUpdate {
                trail: Some(trail_with(state, &self.id)),
                ..TallyUpdate::default()
            },
            Next::End,
        ))
    }
}
