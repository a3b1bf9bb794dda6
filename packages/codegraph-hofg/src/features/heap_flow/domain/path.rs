//! Flow paths rooted at allocation sites

use super::flow_edge::FlowEdge;
use super::vertex::Vertex;
use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};

/// A cycle-free walk of flow edges starting at an `Object` vertex
///
/// An empty path denotes an allocation that is never consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub start: Vertex,
    pub edges: Vec<FlowEdge>,
}

impl Path {
    pub fn new(start: Vertex) -> Self {
        Self {
            start,
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Vertex the walk currently ends at
    pub fn frontier(&self) -> Vertex {
        self.edges.last().map(|e| e.head).unwrap_or(self.start)
    }

    /// The value already appears as head or tail of some edge (or is the start)
    pub fn visits(&self, value: ValueId) -> bool {
        self.start.value == value
            || self
                .edges
                .iter()
                .any(|e| e.head.value == value || e.tail.value == value)
    }

    /// Cycle guard: extending must not revisit a vertex
    pub fn can_extend(&self, edge: &FlowEdge) -> bool {
        edge.tail.value == self.frontier().value && !self.visits(edge.head.value)
    }

    pub fn extend(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    pub fn reaches_sink(&self) -> bool {
        self.edges.iter().any(|e| e.head.is_sink())
    }

    /// Reaches a deallocation through an edge with no guard
    pub fn freed_unconditionally(&self) -> bool {
        self.edges
            .iter()
            .any(|e| e.head.is_sink() && e.is_unconditional())
    }

    /// Edges whose head is never consumed further in this path and is not a sink
    pub fn dangling_edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |edge| {
            !edge.head.is_sink()
                && !self
                    .edges
                    .iter()
                    .any(|other| other.tail.value == edge.head.value)
        })
    }
}
