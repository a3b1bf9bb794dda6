//! JSON report generation

use crate::errors::{HofgError, Result};
use crate::features::heap_flow::domain::{
    BuildStats, CompactionStats, EdgeOrigin, FixpointOutcome, FunctionSummary, GraphSnapshot,
    LeakClassification, VertexKind,
};
use crate::features::heap_flow::HeapFlowResult;
use crate::shared::models::{SourceLocation, ValueId};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct JsonReporter;

#[derive(Serialize)]
struct ReportView<'a> {
    module: &'a str,
    fixpoint: FixpointOutcome,
    raw_graph: GraphSnapshot,
    compacted_graph: GraphSnapshot,
    vertices: Vec<VertexView>,
    edges: Vec<EdgeView<'a>>,
    summaries: &'a [FunctionSummary],
    build: &'a BuildStats,
    compaction: CompactionStats,
    partial: bool,
    classification: &'a LeakClassification,
}

#[derive(Serialize)]
struct VertexView {
    id: ValueId,
    name: String,
    kind: VertexKind,
}

#[derive(Serialize)]
struct EdgeView<'a> {
    tail: ValueId,
    head: ValueId,
    guards: Vec<ValueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    call_site: Option<ValueId>,
}

impl JsonReporter {
    pub fn render(result: &HeapFlowResult) -> Result<String> {
        let vertices = result
            .graph
            .vertices()
            .map(|v| VertexView {
                id: v.value,
                name: result.display(v.value),
                kind: v.kind,
            })
            .collect();

        let edges = result
            .graph
            .edges()
            .iter()
            .map(|e| EdgeView {
                tail: e.tail.value,
                head: e.head.value,
                guards: e.guards.iter().copied().collect(),
                location: e.location.as_ref(),
                call_site: match e.origin {
                    EdgeOrigin::CallSite(call) => Some(call),
                    EdgeOrigin::Local => None,
                },
            })
            .collect();

        let view = ReportView {
            module: &result.module,
            fixpoint: result.fixpoint,
            raw_graph: result.raw_snapshot,
            compacted_graph: result.graph.snapshot(),
            vertices,
            edges,
            summaries: &result.summaries,
            build: &result.build_stats,
            compaction: result.compaction,
            partial: result.partial,
            classification: &result.classification,
        };

        serde_json::to_string_pretty(&view).map_err(|e| HofgError::Report(e.to_string()))
    }

    /// Write the report to `path`
    pub fn save(result: &HeapFlowResult, path: &Path) -> Result<PathBuf> {
        let json = Self::render(result)?;
        std::fs::write(path, json)?;
        Ok(path.to_path_buf())
    }
}
