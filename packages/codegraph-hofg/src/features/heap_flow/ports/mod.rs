//! Heap Flow Ports - Interface Layer (Hexagonal Architecture)
//!
//! - **Primary port**: `HeapFlowAnalyzerPort`, what hosts drive
//! - **Secondary port**: `CallClassifier`, what the builder asks about callees
//!
//! ```rust,ignore
//! use heap_flow::ports::HeapFlowAnalyzerPort;
//!
//! fn run<A: HeapFlowAnalyzerPort>(analyzer: &A, module: &IrModule) -> Result<usize> {
//!     Ok(analyzer.analyze(module)?.classification.may_leak)
//! }
//! ```

use super::domain::{
    BuildStats, CompactionStats, FixpointOutcome, FunctionSummary, GraphSnapshot, Hofg,
    LeakClassification, LeakIssue, Path,
};
use crate::errors::Result;
use crate::shared::models::{IrModule, ValueId};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════
// Primary Port (Driving/Input)
// ═══════════════════════════════════════════════════════════════════════════

/// Heap Flow Analyzer Port
///
/// One call analyzes one translation unit; nothing is kept between calls.
pub trait HeapFlowAnalyzerPort: Send + Sync {
    /// Analyze a module
    ///
    /// Fails only when the module cannot be traversed at all. Unresolved
    /// references, non-convergence and path truncation are reported in the
    /// result instead.
    fn analyze(&self, module: &IrModule) -> Result<HeapFlowResult>;

    /// Analyzer name for logging
    fn name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════════════════════
// Secondary Port (Driven/Output)
// ═══════════════════════════════════════════════════════════════════════════

/// Decides which callees allocate or free heap objects
pub trait CallClassifier: Send + Sync {
    fn is_allocator(&self, callee: &str) -> bool;

    fn is_deallocator(&self, callee: &str) -> bool;

    /// Wrappers are never summarized; their calls count as allocations
    fn is_allocator_wrapper(&self, _callee: &str) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════════════════════

/// Everything one analysis run produced
#[derive(Debug, Clone, Default)]
pub struct HeapFlowResult {
    /// Module name
    pub module: String,

    /// Graph after compaction
    pub graph: Hofg,

    /// Graph size when the fixpoint loop ended, before compaction
    pub raw_snapshot: GraphSnapshot,

    /// Summaries of every defined, non-wrapper function, in module order
    pub summaries: Vec<FunctionSummary>,

    pub build_stats: BuildStats,
    pub fixpoint: FixpointOutcome,
    pub compaction: CompactionStats,

    /// Enumerated paths over the compacted graph
    pub paths: Vec<Path>,

    /// Path enumeration hit the cutoff
    pub partial: bool,

    pub classification: LeakClassification,

    /// Display names of every graph vertex
    pub names: BTreeMap<ValueId, String>,
}

impl HeapFlowResult {
    pub fn issues(&self) -> &[LeakIssue] {
        &self.classification.issues
    }

    pub fn has_issues(&self) -> bool {
        !self.classification.issues.is_empty()
    }

    pub fn may_leak_count(&self) -> usize {
        self.classification.may_leak
    }

    /// Display name of a vertex value, falling back to `%id`
    pub fn display(&self, value: ValueId) -> String {
        self.names
            .get(&value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    pub fn summary(&self, function: &str) -> Option<&FunctionSummary> {
        self.summaries.iter().find(|s| s.name == function)
    }
}
