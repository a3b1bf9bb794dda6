//! Function summaries and their instantiation at call sites

#[path = "../common/mod.rs"]
mod common;

use codegraph_hofg::config::HofgConfig;
use codegraph_hofg::features::heap_flow::{Classification, LeakKind, TransformKind, VertexKind};
use codegraph_hofg::shared::models::{IrType, ModuleBuilder};
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_out_param_leak_reported_inside_callee() {
    let result = analyze(&out_param(false));

    let f = result.summary("f").expect("f is summarized");
    assert!(f.has_transform(0, TransformKind::Allocator));
    assert_eq!(f.classification, Classification::Allocator);

    assert_eq!(result.classification.total_paths, 1);
    assert_may_leak(&result, 1);
    assert_single_issue_at(&result, LeakKind::DanglingPointer, ALLOC_LINE);
    assert_eq!(
        result.issues()[0].allocation_site.as_ref().map(|l| l.line),
        Some(ALLOC_LINE)
    );
}

#[test]
fn test_out_param_freed_by_caller() {
    let result = analyze(&out_param(true));

    assert_converged(&result);
    assert_eq!(result.classification.total_paths, 1);
    assert!(result.paths[0].freed_unconditionally());
    assert_no_leaks(&result);
}

#[test]
fn test_spilled_out_param_freed_by_caller() {
    let result = analyze(&spilled_out_param(true));

    let f = result.summary("f").expect("f is summarized");
    assert!(f.has_transform(0, TransformKind::Allocator));
    assert!(!f.has_transform(0, TransformKind::Deallocator));

    assert_converged(&result);
    assert_eq!(result.classification.total_paths, 1);
    assert!(result.paths[0].freed_unconditionally());
    assert_no_leaks(&result);
}

#[test]
fn test_spilled_out_param_leak_reported_inside_callee() {
    let result = analyze(&spilled_out_param(false));

    assert_may_leak(&result, 1);
    assert_eq!(result.classification.never_freed, 1);
    assert_single_issue_at(&result, LeakKind::DanglingPointer, ALLOC_LINE);
}

#[test]
fn test_spilled_out_param_matches_promoted_lowering() {
    for freed in [true, false] {
        let spilled = analyze(&spilled_out_param(freed));
        let promoted = analyze(&out_param(freed));
        assert_eq!(
            spilled.classification.may_leak, promoted.classification.may_leak,
            "freed = {freed}"
        );
        assert_eq!(spilled.issues().len(), promoted.issues().len(), "freed = {freed}");
    }
}

#[test]
fn test_copy_from_argument_is_deallocator() {
    let mut mb = ModuleBuilder::new("consume.c");
    let mut f = mb.function("consume", 1);
    let pp = f.param(0);
    f.load(pp, IrType::Pointer);
    f.ret(None);
    f.finish();

    let result = analyze(&mb.build());
    let summary = result.summary("consume").expect("summarized");
    assert!(summary.has_transform(0, TransformKind::Deallocator));
    assert_eq!(summary.classification, Classification::Deallocator);
}

#[test]
fn test_global_allocation_released_elsewhere() {
    let result = analyze(&global_cache(true));

    assert_eq!(result.summary("init").map(|s| s.global_allocations.len()), Some(1));
    assert_eq!(
        result.summary("shutdown").map(|s| s.global_deallocations.len()),
        Some(1)
    );
    assert!(result.compaction.duplicates > 0, "replayed edges duplicate local ones");
    assert_converged(&result);
    assert_no_leaks(&result);
}

#[test]
fn test_global_allocation_never_released() {
    let result = analyze(&global_cache(false));

    assert_may_leak(&result, 1);
    assert_eq!(result.classification.never_freed, 1);
    assert_single_issue_at(&result, LeakKind::DanglingPointer, ALLOC_LINE);
}

#[test]
fn test_global_release_counts_even_when_never_called() {
    // Every body is scanned each round, reachable from main or not
    let mut mb = ModuleBuilder::new("cache.c");
    let cache = mb.global("cache");

    let mut init = mb.function("init", 0);
    init.at_line(ALLOC_LINE);
    let p = init.call("malloc", &[]);
    init.store(p, cache);
    init.ret(None);
    init.finish();

    let mut shutdown = mb.function("shutdown", 0);
    let v = shutdown.load(cache, IrType::Pointer);
    shutdown.call_void("free", &[v]);
    shutdown.ret(None);
    shutdown.finish();

    let mut main = mb.function("main", 0);
    main.call_void("init", &[]);
    main.ret(None);
    main.finish();

    let result = analyze(&mb.build());
    assert_eq!(result.classification.total_paths, 1);
    assert!(result.paths[0].freed_unconditionally());
    assert_no_leaks(&result);
}

#[test]
fn test_self_recursion_terminates() {
    let result = analyze(&self_recursive_release());

    assert_converged(&result);
    let release = result.summary("release").expect("summarized");
    assert!(release.has_transform(0, TransformKind::Deallocator));
    assert_eq!(result.compaction.self_loops, 1);
    assert_no_leaks(&result);
}

#[test]
fn test_mutual_recursion_terminates() {
    let result = analyze(&mutual_recursion());

    assert_converged(&result);
    let pong = result.summary("pong").expect("summarized");
    assert!(pong.has_transform(0, TransformKind::Deallocator));
    assert_eq!(result.summaries.len(), 3);
    assert_no_leaks(&result);
}

#[test]
fn test_variadic_extra_arguments_are_skipped() {
    let result = analyze(&variadic_call());

    assert!(result.build_stats.unresolved > 0);
    assert!(result.build_stats.calls > 0);
    assert_no_leaks(&result);
}

#[test]
fn test_allocator_wrapper_is_an_allocation_site() {
    let config = HofgConfig::default().add_allocator_wrapper("xmalloc");
    let result = analyze_with(&wrapper_allocation(), config);

    assert!(result.summary("xmalloc").is_none(), "wrappers are never summarized");
    assert_vertex_count(&result, VertexKind::Object, 1);
    let object = result.graph.objects().next().expect("one object");
    assert_eq!(result.display(object.value), object.value.to_string());
    assert_eq!(result.paths[0].start, object);
    assert_no_leaks(&result);
}

#[test]
fn test_wrapper_without_configuration_is_followed_through_return() {
    let result = analyze(&wrapper_allocation());

    let summary = result.summary("xmalloc").expect("summarized");
    assert!(summary.return_taint);
    assert_vertex_count(&result, VertexKind::Object, 1);
    assert_no_leaks(&result);
}

#[test]
fn test_returned_allocation_freed_by_caller() {
    let result = analyze(&returned_allocation(true));

    assert!(result.summary("make").map(|s| s.return_taint).unwrap_or(false));
    assert_no_leaks(&result);
}

#[test]
fn test_returned_allocation_leak_falls_back_to_allocation_site() {
    let result = analyze(&returned_allocation(false));

    assert_may_leak(&result, 1);
    let issue = &result.issues()[0];
    assert_eq!(issue.location, None, "the flow ends on an instantiated edge");
    assert_single_issue_at(&result, LeakKind::DanglingPointer, ALLOC_LINE);
}
