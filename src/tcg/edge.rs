//! TCG edge types.

use std::fmt;

use super::vertex::VertexId;

/// Stable arena index of an [`Edge`] within a [`crate::tcg::Tcg`].
pub type EdgeId = usize;

/// The four edge kinds of the Timing Conflict Graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    /// Same-vehicle sequential ordering; always decided.
    Type1,
    /// Committed mutual-exclusion conflict.
    Type2,
    /// Undecided conflict, stored as a mirrored half-edge pair.
    Type3,
    /// Execution order chosen for a formerly undecided conflict.
    Type4,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeType::Type1 => "type_1",
            EdgeType::Type2 => "type_2",
            EdgeType::Type3 => "type_3",
            EdgeType::Type4 => "type_4",
        };
        write!(f, "{s}")
    }
}

/// A directed edge between two TCG vertices.
///
/// TYPE_3 conflicts are represented as two `Edge`s pointing at each other
/// (`mirror`), both undecided, until [`crate::tcg::Tcg::start_execute`]
/// promotes one to TYPE_4 and tombstones the other.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub edge_type: EdgeType,
    pub decided: bool,
    pub waiting_time: u64,
    pub mirror: Option<EdgeId>,
    pub(crate) removed: bool,
}

impl Edge {
    pub(crate) fn new(
        from: VertexId,
        to: VertexId,
        edge_type: EdgeType,
        decided: bool,
        waiting_time: u64,
        mirror: Option<EdgeId>,
    ) -> Self {
        Edge {
            from,
            to,
            edge_type,
            decided,
            waiting_time,
            mirror,
            removed: false,
        }
    }
}
