//! Graph compactor
//!
//! Cleanup passes run once, after the fixpoint. Every pass computes the edges
//! to keep and replaces the edge list in one go. The four passes repeat until
//! a whole sweep removes nothing, so compacting a compacted graph is a no-op.

use crate::features::heap_flow::domain::{
    CompactionStats, EdgeOrigin, FlowEdge, GuardSet, Hofg,
};
use crate::shared::models::ValueId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphCompactor;

impl GraphCompactor {
    pub fn new() -> Self {
        Self
    }

    pub fn compact(&self, graph: &mut Hofg) -> CompactionStats {
        let mut stats = CompactionStats::default();

        loop {
            stats.sweeps += 1;
            let before = graph.edge_count();

            stats.duplicates += Self::remove_duplicates(graph);
            stats.reverse_pairs += Self::remove_reverse_pairs(graph);
            stats.dead_ends += Self::remove_dead_ends(graph);
            stats.self_loops += Self::remove_self_loops(graph);

            if graph.edge_count() == before {
                break;
            }
        }

        tracing::debug!(
            "Compaction removed {} edges in {} sweeps",
            stats.removed(),
            stats.sweeps
        );
        stats
    }

    fn retain(graph: &mut Hofg, mut keep: impl FnMut(usize, &FlowEdge) -> bool) -> usize {
        let before = graph.edge_count();
        let kept: Vec<FlowEdge> = graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(idx, edge)| keep(*idx, edge))
            .map(|(_, edge)| edge.clone())
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            graph.replace_edges(kept);
        }
        removed
    }

    /// Same (tail, head, guards): keep the first
    fn remove_duplicates(graph: &mut Hofg) -> usize {
        let mut seen: FxHashSet<(ValueId, ValueId, GuardSet)> = FxHashSet::default();
        Self::retain(graph, |_, edge| {
            let (tail, head, guards) = edge.flow_key();
            seen.insert((tail, head, guards.clone()))
        })
    }

    /// `A → B` and `B → A`: keep one direction
    ///
    /// Preference: an edge leaving an object, then an instantiated edge, then
    /// whichever came first.
    fn remove_reverse_pairs(graph: &mut Hofg) -> usize {
        let rank = |edge: &FlowEdge| -> u8 {
            if edge.tail.is_object() {
                2
            } else if matches!(edge.origin, EdgeOrigin::CallSite(_)) {
                1
            } else {
                0
            }
        };

        // unordered pair → (kept direction, its rank)
        let mut kept: FxHashMap<(ValueId, ValueId), ((ValueId, ValueId), u8)> = FxHashMap::default();
        for edge in graph.edges() {
            let (tail, head) = (edge.tail.value, edge.head.value);
            if tail == head || !graph.has_edge(head, tail) {
                continue;
            }
            let pair = (tail.min(head), tail.max(head));
            let candidate = ((tail, head), rank(edge));
            kept.entry(pair)
                .and_modify(|current| {
                    if candidate.1 > current.1 {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        }

        if kept.is_empty() {
            return 0;
        }

        Self::retain(graph, |_, edge| {
            let (tail, head) = (edge.tail.value, edge.head.value);
            match kept.get(&(tail.min(head), tail.max(head))) {
                Some((direction, _)) => *direction == (tail, head),
                None => true,
            }
        })
    }

    /// Head has no onward flow, is not a sink, and the tail is not an object
    fn remove_dead_ends(graph: &mut Hofg) -> usize {
        let mut out_degree: FxHashMap<ValueId, usize> = FxHashMap::default();
        for edge in graph.edges() {
            *out_degree.entry(edge.tail.value).or_default() += 1;
        }

        Self::retain(graph, |_, edge| {
            if edge.head.is_sink() || edge.tail.is_object() {
                return true;
            }
            let onward = out_degree.get(&edge.head.value).copied().unwrap_or(0)
                - usize::from(edge.is_self_loop());
            onward > 0
        })
    }

    fn remove_self_loops(graph: &mut Hofg) -> usize {
        Self::retain(graph, |_, edge| !edge.is_self_loop())
    }
}
