//! Property-based tests for compaction, path enumeration and classification
//!
//! Invariants that hold for ALL flow graphs:
//! - Idempotence: compact(compact(g)) == compact(g)
//! - Cleanliness: no duplicates, reverse pairs or self loops survive
//! - Dead vertices: isolated vertices never appear in an enumerated path
//! - Unused allocations: one report per empty path

#[path = "../common/mod.rs"]
mod common;

use codegraph_hofg::features::heap_flow::domain::{
    EdgeKey, FlowEdge, Hofg, LeakKind, Vertex,
};
use codegraph_hofg::features::heap_flow::infrastructure::{
    GraphCompactor, LeakClassifier, PathEnumerator,
};
use codegraph_hofg::shared::models::{SourceLocation, ValueId};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Generators
// ============================================================================

/// Kind is a function of the value so a value never changes kind
fn vertex(value: u32) -> Vertex {
    match value % 6 {
        0 => Vertex::object(ValueId(value)),
        5 => Vertex::sink(ValueId(value)),
        _ => Vertex::pointer(ValueId(value)),
    }
}

type RawEdge = (u32, u32, u8, Option<u32>);

fn raw_edges() -> impl Strategy<Value = Vec<RawEdge>> {
    prop::collection::vec(
        (0u32..14, 0u32..14, 0u8..4, prop::option::of(0u32..3)),
        0..48,
    )
}

fn build(raw: &[RawEdge], isolated: &[u32]) -> Hofg {
    let mut graph = Hofg::new();
    for &value in isolated {
        graph.insert_vertex(vertex(value));
    }
    for &(tail, head, guard_bits, call) in raw {
        let guards = [100u32, 101]
            .iter()
            .enumerate()
            .filter(|(bit, _)| guard_bits & (1 << bit) != 0)
            .map(|(_, &g)| ValueId(g))
            .collect();
        let mut edge = FlowEdge::new(vertex(tail), vertex(head))
            .with_guards(guards)
            .with_location(Some(SourceLocation::new("gen.c", tail)));
        if let Some(call) = call {
            edge = edge.at_call_site(ValueId(200 + call));
        }
        graph.add_edge(edge);
    }
    graph
}

fn keys(graph: &Hofg) -> Vec<EdgeKey> {
    graph.edges().iter().map(FlowEdge::key).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_compaction_is_idempotent(raw in raw_edges()) {
        let mut graph = build(&raw, &[]);
        let compactor = GraphCompactor::new();

        compactor.compact(&mut graph);
        let once = keys(&graph);

        let stats = compactor.compact(&mut graph);
        prop_assert_eq!(stats.removed(), 0);
        prop_assert_eq!(stats.sweeps, 1);
        prop_assert_eq!(keys(&graph), once);
    }

    #[test]
    fn prop_compaction_only_removes(raw in raw_edges()) {
        let mut graph = build(&raw, &[]);
        let before: HashSet<EdgeKey> = keys(&graph).into_iter().collect();
        let edges_before = graph.edge_count();

        let stats = GraphCompactor::new().compact(&mut graph);

        prop_assert_eq!(edges_before - graph.edge_count(), stats.removed());
        prop_assert!(keys(&graph).iter().all(|k| before.contains(k)));
    }

    #[test]
    fn prop_compacted_graph_is_clean(raw in raw_edges()) {
        let mut graph = build(&raw, &[]);
        GraphCompactor::new().compact(&mut graph);

        let mut flows = HashSet::new();
        for edge in graph.edges() {
            prop_assert!(!edge.is_self_loop());
            prop_assert!(!graph.has_edge(edge.head.value, edge.tail.value));
            let (tail, head, guards) = edge.flow_key();
            prop_assert!(flows.insert((tail, head, guards.clone())), "duplicate flow survived");
        }
    }

    #[test]
    fn prop_isolated_vertices_never_in_paths(
        raw in raw_edges(),
        isolated in prop::collection::vec(20u32..40, 0..6),
    ) {
        let mut graph = build(&raw, &isolated);
        GraphCompactor::new().compact(&mut graph);
        let connected = graph.connected_values();
        let present: HashSet<EdgeKey> = keys(&graph).into_iter().collect();

        let enumeration = PathEnumerator::new(10_000).enumerate(&graph);
        for path in &enumeration.paths {
            prop_assert!(path.start.is_object());
            if !connected.contains(&path.start.value) {
                prop_assert!(path.is_empty(), "isolated object only seeds an empty path");
            }

            let mut seen = HashSet::from([path.start.value]);
            for edge in &path.edges {
                prop_assert!(present.contains(&edge.key()));
                prop_assert!(connected.contains(&edge.tail.value));
                prop_assert!(seen.insert(edge.head.value), "cycle guard violated");
            }
        }

        let isolated_pointers = isolated
            .iter()
            .map(|&v| vertex(v))
            .filter(|v| !v.is_object() && !connected.contains(&v.value));
        for vertex in isolated_pointers {
            prop_assert!(enumeration.paths.iter().all(|p| !p.visits(vertex.value)));
        }
    }

    #[test]
    fn prop_one_unused_report_per_empty_path(
        raw in raw_edges(),
        isolated in prop::collection::vec(20u32..40, 0..6),
    ) {
        let mut graph = build(&raw, &isolated);
        GraphCompactor::new().compact(&mut graph);
        let paths = PathEnumerator::new(10_000).enumerate(&graph).paths;

        let classification = LeakClassifier::new()
            .classify_with(&paths, |v| Some(SourceLocation::new("gen.c", v.0)));

        let empty: Vec<ValueId> = paths.iter().filter(|p| p.is_empty()).map(|p| p.start.value).collect();
        let unused: Vec<_> = classification
            .issues
            .iter()
            .filter(|i| i.kind == LeakKind::UnusedAllocation)
            .collect();

        prop_assert_eq!(unused.len(), empty.len());
        for issue in unused {
            prop_assert!(empty.contains(&issue.allocation));
            prop_assert_eq!(
                issue.location.as_ref().map(|l| l.line),
                Some(issue.allocation.0)
            );
        }
        prop_assert_eq!(
            classification.may_leak + classification.unconditionally_freed,
            classification.total_paths
        );
    }
}

// ============================================================================
// Whole-pipeline compaction
// ============================================================================

#[test]
fn test_pipeline_output_is_already_compact() {
    let fixtures = [
        common::round_trip(),
        common::out_param(true),
        common::out_param(false),
        common::spilled_out_param(true),
        common::spilled_out_param(false),
        common::conditional_free(),
        common::global_cache(true),
        common::self_recursive_release(),
        common::mutual_recursion(),
        common::variadic_call(),
    ];

    for module in &fixtures {
        let mut graph = common::analyze(module).graph;
        let stats = GraphCompactor::new().compact(&mut graph);
        assert_eq!(stats.removed(), 0, "{} was not fully compacted", module.name);
    }
}
