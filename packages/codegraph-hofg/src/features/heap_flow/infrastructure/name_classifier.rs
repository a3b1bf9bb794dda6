//! Name-list call classifier

use crate::config::HofgConfig;
use crate::features::heap_flow::ports::CallClassifier;
use rustc_hash::FxHashSet;

/// Classifies callees by exact symbol name
#[derive(Debug, Clone, Default)]
pub struct NameListClassifier {
    allocators: FxHashSet<String>,
    deallocators: FxHashSet<String>,
    wrappers: FxHashSet<String>,
}

impl NameListClassifier {
    pub fn new<A, D, W>(allocators: A, deallocators: D, wrappers: W) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            allocators: allocators.into_iter().map(Into::into).collect(),
            deallocators: deallocators.into_iter().map(Into::into).collect(),
            wrappers: wrappers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &HofgConfig) -> Self {
        Self::new(
            config.allocators.iter().cloned(),
            config.deallocators.iter().cloned(),
            config.allocator_wrappers.iter().cloned(),
        )
    }
}

impl CallClassifier for NameListClassifier {
    fn is_allocator(&self, callee: &str) -> bool {
        self.allocators.contains(callee) || self.wrappers.contains(callee)
    }

    fn is_deallocator(&self, callee: &str) -> bool {
        self.deallocators.contains(callee)
    }

    fn is_allocator_wrapper(&self, callee: &str) -> bool {
        self.wrappers.contains(callee)
    }

    fn name(&self) -> &'static str {
        "name-list"
    }
}
