//! The consultation workflow: state, nodes, and the graphs that wire them.
//!
//! Build [`Collaborators`] once, compile a [`ConsultationGraph`] for the wanted
//! [`Workflow`], then call [`ConsultationGraph::run`] per request.

mod build;
pub mod messages;
pub mod nodes;
pub mod state;

pub use build::{
    build_consultation, build_hospitals, build_knowledge_consult, build_preventive,
    build_symptom, build_vision_consult, Collaborators, ConsultationGraph, Workflow,
};
pub use state::{ConsultState, Evidence, Intent, Patch, RouteLabel, StateField, StateUpdate};
