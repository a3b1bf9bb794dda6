//! Custom assertions for analysis results

use codegraph_hofg::features::heap_flow::{HeapFlowResult, LeakKind, VertexKind};

/// Assert that no path may leak and no issue is reported
pub fn assert_no_leaks(result: &HeapFlowResult) {
    assert_eq!(
        result.may_leak_count(),
        0,
        "Expected no may-leak paths, got {}. Issues: {:?}",
        result.may_leak_count(),
        result.issues()
    );
    assert!(
        !result.has_issues(),
        "Expected no issues, got: {:?}",
        result.issues()
    );
}

/// Assert the number of may-leak paths
pub fn assert_may_leak(result: &HeapFlowResult, expected: usize) {
    assert_eq!(
        result.may_leak_count(),
        expected,
        "Expected {expected} may-leak paths, got {}. Paths: {:?}",
        result.may_leak_count(),
        result.paths
    );
}

/// Assert the number of compacted-graph vertices of `kind`
pub fn assert_vertex_count(result: &HeapFlowResult, kind: VertexKind, expected: usize) {
    let actual = result.graph.vertices().filter(|v| v.kind == kind).count();
    assert_eq!(
        actual, expected,
        "Expected {expected} {kind} vertices, got {actual}"
    );
}

/// Assert that exactly one issue of `kind` is reported on `line`
pub fn assert_single_issue_at(result: &HeapFlowResult, kind: LeakKind, line: u32) {
    assert_eq!(
        result.issues().len(),
        1,
        "Expected exactly one issue, got: {:?}",
        result.issues()
    );
    let issue = &result.issues()[0];
    assert_eq!(issue.kind, kind);
    assert_eq!(
        issue.reported_location().map(|l| l.line),
        Some(line),
        "Issue reported at the wrong place: {}",
        issue
    );
}

/// Assert that the fixpoint stabilized within the round cap
pub fn assert_converged(result: &HeapFlowResult) {
    assert!(
        result.fixpoint.converged,
        "Fixpoint did not converge after {} rounds",
        result.fixpoint.rounds
    );
}
