//! IR/config loading from disk and report rendering

#[path = "../common/mod.rs"]
mod common;

use codegraph_hofg::config::HofgConfig;
use codegraph_hofg::errors::HofgError;
use codegraph_hofg::features::heap_flow::{HeapFlowAnalysisService, HeapFlowAnalyzerPort};
use codegraph_hofg::features::ir_loading::{IrProvider, JsonIrProvider};
use codegraph_hofg::report::{DotReporter, JsonReporter, ReportFormat, TextReporter};
use codegraph_hofg::shared::models::{BlockId, IrModule, ModuleBuilder};
use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;

fn write_json(module: &IrModule) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string_pretty(module).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_json_file_analysis_matches_in_memory() {
    let module = out_param(true);
    let file = write_json(&module);

    let loaded = JsonIrProvider::from_path(file.path()).load().unwrap();
    assert_eq!(loaded, module);

    let from_disk = codegraph_hofg::analyze_file(file.path(), HofgConfig::default()).unwrap();
    let in_memory = analyze(&module);
    assert_eq!(
        TextReporter::render(&from_disk),
        TextReporter::render(&in_memory)
    );
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"name\": ").unwrap();

    let err = JsonIrProvider::from_path(file.path()).load().unwrap_err();
    assert!(matches!(err, HofgError::Parse(_)), "got {err}");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonIrProvider::from_path(dir.path().join("absent.json"))
        .load()
        .unwrap_err();
    assert!(matches!(err, HofgError::Io(_)));
}

#[test]
fn test_dangling_branch_target_is_malformed() {
    let mut mb = ModuleBuilder::new("bad.c");
    let mut f = mb.function("main", 0);
    f.br(BlockId(7));
    f.finish();
    let file = write_json(&mb.build());

    let module = JsonIrProvider::from_path(file.path()).load().unwrap();
    let err = HeapFlowAnalysisService::default().analyze(&module).unwrap_err();
    assert!(matches!(err, HofgError::MalformedIr(_)));
}

#[test]
fn test_yaml_config_enables_wrapper() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "version: 1\npreset: fast\noverrides:\n  allocator_wrappers: [xmalloc]"
    )
    .unwrap();

    let config = HofgConfig::from_yaml(file.path()).unwrap();
    assert_eq!(config.max_rounds, 4);
    assert_eq!(config.allocator_wrappers, vec!["xmalloc".to_string()]);

    let result = analyze_with(&wrapper_allocation(), config);
    assert!(result.summary("xmalloc").is_none());
    assert_no_leaks(&result);
}

#[test]
fn test_yaml_config_rejects_unknown_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "version: 1\nmax_depth: 3").unwrap();
    assert!(HofgConfig::from_yaml(file.path()).is_err());
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_text_report_of_out_param_leak() {
    let result = analyze(&out_param(false));

    let expected = "\
%2 --> %arg0
paths: 1
may-leak paths: 1
never-freed paths: 1
dangling pointer at out_param.c:10
";
    assert_eq!(TextReporter::render(&result), expected);
}

#[test]
fn test_text_report_of_freed_round_trip() {
    let result = analyze(&round_trip());

    let expected = "\
%1 --> %2
%2 --> %4
paths: 1
may-leak paths: 0
never-freed paths: 0
";
    assert_eq!(TextReporter::render(&result), expected);
}

#[test]
fn test_json_report_carries_summaries_and_counts() {
    let result = analyze(&out_param(false));
    let json = JsonReporter::render(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["module"], "out_param.c");
    assert_eq!(value["fixpoint"]["converged"], true);
    assert_eq!(value["classification"]["may_leak"], 1);
    assert_eq!(value["classification"]["issues"][0]["kind"], "DanglingPointer");

    let summaries = value["summaries"].as_array().unwrap();
    let f = summaries.iter().find(|s| s["name"] == "f").unwrap();
    assert_eq!(f["classification"], "Allocator");
    assert_eq!(f["argument_transforms"][0]["kind"], "Allocator");
}

#[test]
fn test_json_report_saved_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let result = analyze(&unused_allocation());

    JsonReporter::save(&result, &path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["classification"]["issues"][0]["kind"], "UnusedAllocation");
}

#[test]
fn test_dot_report_lists_vertices() {
    let result = analyze(&round_trip());
    let dot = DotReporter::render(&result);

    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("(object)"));
    assert!(dot.contains("(pointer)"));
    assert!(dot.contains("(sink)"));
}

#[test]
fn test_every_format_renders() {
    let result = analyze(&conditional_free());
    for name in ["text", "json", "dot"] {
        let format = ReportFormat::from_str(name).unwrap();
        let rendered = format.render(&result).unwrap();
        assert!(!rendered.is_empty(), "{name} report is empty");
    }
}
