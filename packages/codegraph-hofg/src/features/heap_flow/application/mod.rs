//! Heap Flow Application Layer
//!
//! `HeapFlowAnalysisService` wires the phases together:
//!
//! ```text
//! IrModule → ModuleIndex → HofgBuilder ⇄ SummaryTable (FixpointDriver)
//!          → GraphCompactor → PathEnumerator → LeakClassifier → HeapFlowResult
//! ```

use super::domain::Hofg;
use super::infrastructure::{
    FixpointDriver, GraphCompactor, HofgBuilder, LeakClassifier, NameListClassifier,
    PathEnumerator,
};
use super::ports::{CallClassifier, HeapFlowAnalyzerPort, HeapFlowResult};
use crate::config::HofgConfig;
use crate::errors::Result;
use crate::shared::models::{IrModule, ModuleIndex, ValueId};
use std::collections::BTreeMap;

/// Heap Flow Analysis Service
///
/// ```rust,ignore
/// let service = HeapFlowAnalysisService::new(HofgConfig::default());
/// let result = service.analyze(&module)?;
/// println!("{} may-leak paths", result.may_leak_count());
/// ```
pub struct HeapFlowAnalysisService {
    config: HofgConfig,
    classifier: Box<dyn CallClassifier>,
}

impl HeapFlowAnalysisService {
    /// Service classifying callees by the configured name lists
    pub fn new(config: HofgConfig) -> Self {
        let classifier = Box::new(NameListClassifier::from_config(&config));
        Self { config, classifier }
    }

    /// Replace the call classifier
    pub fn with_classifier(mut self, classifier: Box<dyn CallClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &HofgConfig {
        &self.config
    }

    fn run(&self, module: &IrModule) -> Result<HeapFlowResult> {
        self.config.validate()?;
        let index = ModuleIndex::new(module)?;

        tracing::info!(
            "HOFG analysis of '{}': {} functions, classifier={}",
            module.name,
            module.functions.len(),
            self.classifier.name()
        );

        // Phase 1: build to a fixpoint
        let mut builder = HofgBuilder::new(&index, self.classifier.as_ref());
        let fixpoint = FixpointDriver::new(self.config.max_rounds).run(&mut builder);
        let (mut graph, summaries, build_stats) = builder.into_parts();
        let raw_snapshot = graph.snapshot();
        tracing::info!(
            "Built HOFG in {} rounds: {} vertices, {} edges",
            fixpoint.rounds,
            raw_snapshot.vertices,
            raw_snapshot.edges
        );

        // Phase 2: cleanup
        let compaction = GraphCompactor::new().compact(&mut graph);

        // Phase 3: paths and classification
        let enumeration = PathEnumerator::new(self.config.max_paths).enumerate(&graph);
        let classification = LeakClassifier::new().classify(&enumeration.paths, &index);
        tracing::info!(
            "{} paths, {} may leak, {} issues",
            classification.total_paths,
            classification.may_leak,
            classification.issues.len()
        );

        let names = Self::names(&graph, &index);
        Ok(HeapFlowResult {
            module: module.name.clone(),
            graph,
            raw_snapshot,
            summaries,
            build_stats,
            fixpoint,
            compaction,
            paths: enumeration.paths,
            partial: enumeration.partial,
            classification,
            names,
        })
    }

    fn names(graph: &Hofg, index: &ModuleIndex<'_>) -> BTreeMap<ValueId, String> {
        graph
            .vertices()
            .map(|v| (v.value, index.display_name(v.value)))
            .collect()
    }
}

impl Default for HeapFlowAnalysisService {
    fn default() -> Self {
        Self::new(HofgConfig::default())
    }
}

impl HeapFlowAnalyzerPort for HeapFlowAnalysisService {
    fn analyze(&self, module: &IrModule) -> Result<HeapFlowResult> {
        self.run(module)
    }

    fn name(&self) -> &'static str {
        "hofg"
    }
}
