//! Heap Object Flow Graph
//!
//! Vertex set plus an insertion-ordered edge list. Edges are deduplicated on
//! insertion by `EdgeKey`; cleanup passes replace the edge list wholesale
//! (`replace_edges`) instead of erasing while iterating.

use super::flow_edge::{EdgeKey, FlowEdge};
use super::vertex::{Vertex, VertexKind};
use crate::shared::models::ValueId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural snapshot compared between fixpoint rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: usize,
    pub edges: usize,
}

/// The HOFG
#[derive(Debug, Clone, Default)]
pub struct Hofg {
    vertices: BTreeMap<ValueId, Vertex>,
    edges: Vec<FlowEdge>,
    edge_keys: FxHashSet<EdgeKey>,
    /// (tail, head) pairs regardless of guards/origin
    pairs: FxHashSet<(ValueId, ValueId)>,
}

impl Hofg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&self, value: ValueId) -> Option<Vertex> {
        self.vertices.get(&value).copied()
    }

    #[inline]
    pub fn contains_vertex(&self, value: ValueId) -> bool {
        self.vertices.contains_key(&value)
    }

    /// Insert a vertex, or return the one already recorded for its value
    pub fn insert_vertex(&mut self, vertex: Vertex) -> Vertex {
        *self.vertices.entry(vertex.value).or_insert(vertex)
    }

    /// Insert an edge; endpoints are inserted first so the edge always
    /// references recorded vertices (with their recorded kinds).
    ///
    /// Returns `false` if an edge with the same identity already exists.
    pub fn add_edge(&mut self, mut edge: FlowEdge) -> bool {
        edge.tail = self.insert_vertex(edge.tail);
        edge.head = self.insert_vertex(edge.head);

        if !self.edge_keys.insert(edge.key()) {
            return false;
        }
        self.pairs.insert((edge.tail.value, edge.head.value));
        self.edges.push(edge);
        true
    }

    /// Any edge `tail → head`, whatever its guards or origin
    pub fn has_edge(&self, tail: ValueId, head: ValueId) -> bool {
        self.pairs.contains(&(tail, head))
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Allocation-site vertices in value order
    pub fn objects(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices
            .values()
            .filter(|v| v.kind == VertexKind::Object)
            .copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self.vertex_count(),
            edges: self.edge_count(),
        }
    }

    /// Outgoing edge indices per tail value, in edge order
    pub fn out_edges(&self) -> FxHashMap<ValueId, Vec<usize>> {
        let mut out: FxHashMap<ValueId, Vec<usize>> = FxHashMap::default();
        for (idx, edge) in self.edges.iter().enumerate() {
            out.entry(edge.tail.value).or_default().push(idx);
        }
        out
    }

    /// Values with at least one incident edge
    pub fn connected_values(&self) -> FxHashSet<ValueId> {
        self.edges
            .iter()
            .flat_map(|e| [e.tail.value, e.head.value])
            .collect()
    }

    /// Objects with an edge into `value`
    pub fn objects_feeding(&self, value: ValueId) -> Vec<Vertex> {
        let mut objects: Vec<Vertex> = self
            .edges
            .iter()
            .filter(|e| e.head.value == value && e.tail.is_object())
            .map(|e| e.tail)
            .collect();
        objects.sort();
        objects.dedup();
        objects
    }

    /// `value` is an object or is fed directly by one
    pub fn carries_object(&self, value: ValueId) -> bool {
        self.vertex(value).map(|v| v.is_object()).unwrap_or(false)
            || self
                .edges
                .iter()
                .any(|e| e.head.value == value && e.tail.is_object())
    }

    /// Atomically replace the edge list (vertices are kept)
    pub fn replace_edges(&mut self, edges: Vec<FlowEdge>) {
        self.edge_keys = edges.iter().map(FlowEdge::key).collect();
        self.pairs = edges
            .iter()
            .map(|e| (e.tail.value, e.head.value))
            .collect();
        self.edges = edges;
    }
}
