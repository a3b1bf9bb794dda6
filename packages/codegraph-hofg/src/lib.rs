/*
 * Codegraph HOFG - Heap Object Flow Graph Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : IR data model (modules, functions, blocks, instructions)
 * - features/    : Vertical slices (ir_loading → heap_flow)
 * - report/      : Text, JSON and DOT renderers
 * - config/      : Presets, YAML, validation
 *
 * Pipeline:
 * - Build the HOFG to a fixpoint with interprocedural summaries
 * - Compact, enumerate allocation paths, classify leaks
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Pattern handlers take the full scan context
#![allow(clippy::type_complexity)] // Keyed index maps
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::upper_case_acronyms)] // HOFG, IR naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration: presets, YAML files, validation
pub mod config;

/// Error types
pub mod errors;

/// Feature slices
pub mod features;

/// Report renderers
pub mod report;

/// Shared models: the IR the analysis consumes
pub mod shared;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{HofgConfig, Preset};
pub use errors::{HofgError, Result};
pub use features::heap_flow::{
    CallClassifier, HeapFlowAnalysisService, HeapFlowAnalyzerPort, HeapFlowResult, LeakIssue,
    LeakKind,
};
pub use features::ir_loading::{IrProvider, JsonIrProvider};
pub use report::{DotReporter, JsonReporter, ReportFormat, TextReporter};
pub use shared::models::{IrModule, ModuleBuilder};

/// Load a JSON IR file and analyze it with `config`
///
/// ```rust,ignore
/// let result = codegraph_hofg::analyze_file("leak.json", HofgConfig::default())?;
/// print!("{}", TextReporter::render(&result));
/// ```
pub fn analyze_file(
    path: impl AsRef<std::path::Path>,
    config: HofgConfig,
) -> Result<HeapFlowResult> {
    let module = JsonIrProvider::from_path(path).load()?;
    HeapFlowAnalysisService::new(config).analyze(&module)
}
