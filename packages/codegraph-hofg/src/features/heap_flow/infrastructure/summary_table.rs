//! Function summary table
//!
//! Summaries live for the whole analysis run and are refined in place across
//! fixpoint rounds. A summary is registered *before* its function body is
//! scanned, so a recursive call observes the in-progress summary instead of
//! re-entering generation.

use crate::features::heap_flow::domain::FunctionSummary;
use crate::shared::models::FunctionId;
use rustc_hash::{FxHashMap, FxHashSet};

/// Scan state of a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryState {
    /// Body scan running (somewhere up the call stack)
    InProgress,

    /// Body scanned at least once
    Complete,
}

/// Summaries keyed by function
#[derive(Debug, Default)]
pub struct SummaryTable {
    summaries: FxHashMap<FunctionId, FunctionSummary>,
    states: FxHashMap<FunctionId, SummaryState>,
    /// Functions whose body was scanned in the current round
    scanned: FxHashSet<FunctionId>,
    round: usize,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fixpoint round; every function becomes eligible again
    pub fn begin_round(&mut self) {
        self.scanned.clear();
        self.round += 1;
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn contains(&self, function: FunctionId) -> bool {
        self.summaries.contains_key(&function)
    }

    pub fn get(&self, function: FunctionId) -> Option<&FunctionSummary> {
        self.summaries.get(&function)
    }

    pub fn get_mut(&mut self, function: FunctionId) -> Option<&mut FunctionSummary> {
        self.summaries.get_mut(&function)
    }

    pub fn state(&self, function: FunctionId) -> Option<SummaryState> {
        self.states.get(&function).copied()
    }

    pub fn is_in_progress(&self, function: FunctionId) -> bool {
        self.state(function) == Some(SummaryState::InProgress)
    }

    pub fn scanned_this_round(&self, function: FunctionId) -> bool {
        self.scanned.contains(&function)
    }

    /// Register `function` for a body scan
    ///
    /// The summary is created with `make` on first use and kept otherwise.
    /// Returns `false` when the function is already being scanned or was
    /// scanned in this round.
    pub fn begin_scan(
        &mut self,
        function: FunctionId,
        make: impl FnOnce() -> FunctionSummary,
    ) -> bool {
        if self.is_in_progress(function) || self.scanned.contains(&function) {
            return false;
        }

        self.summaries.entry(function).or_insert_with(make);
        self.states.insert(function, SummaryState::InProgress);
        self.scanned.insert(function);
        true
    }

    /// Body scan done: refresh the classification
    pub fn finish_scan(&mut self, function: FunctionId) {
        if let Some(summary) = self.summaries.get_mut(&function) {
            summary.reclassify();
        }
        self.states.insert(function, SummaryState::Complete);
    }

    /// Amount of evidence recorded so far; grows monotonically
    pub fn evidence(&self) -> usize {
        self.summaries
            .values()
            .map(|s| {
                s.argument_transforms.len()
                    + s.global_allocations.len()
                    + s.global_deallocations.len()
                    + s.return_values.len()
                    + usize::from(s.return_taint)
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Summaries in function order
    pub fn into_summaries(self) -> Vec<FunctionSummary> {
        let mut summaries: Vec<FunctionSummary> = self.summaries.into_values().collect();
        summaries.sort_by_key(|s| s.function);
        summaries
    }
}
