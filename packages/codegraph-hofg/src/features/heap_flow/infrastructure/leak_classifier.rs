//! Leak/dangling classifier
//!
//! Paths freed unconditionally are pruned; what survives may leak. Each
//! surviving path reports its unused allocation (empty path) or every edge
//! whose head is never consumed further and is not a sink.

use crate::features::heap_flow::domain::{LeakClassification, LeakIssue, Path};
use crate::shared::models::{ModuleIndex, SourceLocation, ValueId};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeakClassifier;

impl LeakClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify with allocation sites resolved through the module index
    pub fn classify(&self, paths: &[Path], index: &ModuleIndex<'_>) -> LeakClassification {
        self.classify_with(paths, |value| index.location_of(value).cloned())
    }

    pub fn classify_with(
        &self,
        paths: &[Path],
        allocation_site: impl Fn(ValueId) -> Option<SourceLocation>,
    ) -> LeakClassification {
        let total_paths = paths.len();
        let never_freed = paths.iter().filter(|p| !p.reaches_sink()).count();

        let surviving: Vec<&Path> = paths.iter().filter(|p| !p.freed_unconditionally()).collect();

        let mut issues: Vec<LeakIssue> = Vec::new();
        // Forked paths share prefixes
        let mut reported: FxHashSet<LeakIssue> = FxHashSet::default();
        for path in &surviving {
            let start = path.start.value;
            let site = allocation_site(start);

            if path.is_empty() {
                issues.push(LeakIssue::unused_allocation(start, site));
                continue;
            }

            for edge in path.dangling_edges() {
                let issue =
                    LeakIssue::dangling_pointer(start, edge.head.value, edge.location.clone(), site.clone());
                if reported.insert(issue.clone()) {
                    issues.push(issue);
                }
            }
        }

        LeakClassification {
            total_paths,
            unconditionally_freed: total_paths - surviving.len(),
            may_leak: surviving.len(),
            never_freed,
            issues,
        }
    }
}
