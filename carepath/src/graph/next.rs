//! What a node asks the executor to do after its update is merged.

/// Continuation requested by a node.
///
/// `Continue` follows the node's outgoing edge (fixed or conditional). `End` halts the
/// whole run right after the update is merged; nodes use it to short-circuit on input
/// they cannot act on (e.g. an empty query answered with a clarification).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Next {
    #[default]
    Continue,
    End,
}
