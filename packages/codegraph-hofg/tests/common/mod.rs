//! Common test utilities for codegraph-hofg
//!
//! Fixtures build small IR modules with `ModuleBuilder`; assertions check
//! analysis results in domain terms.

#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use fixtures::*;

use codegraph_hofg::config::HofgConfig;
use codegraph_hofg::features::heap_flow::{
    HeapFlowAnalysisService, HeapFlowAnalyzerPort, HeapFlowResult,
};
use codegraph_hofg::shared::models::IrModule;

/// Analyze with the default (balanced) configuration
pub fn analyze(module: &IrModule) -> HeapFlowResult {
    analyze_with(module, HofgConfig::default())
}

pub fn analyze_with(module: &IrModule, config: HofgConfig) -> HeapFlowResult {
    HeapFlowAnalysisService::new(config)
        .analyze(module)
        .expect("analysis should complete")
}
