//! Phase outcomes and counters

use super::issue::LeakIssue;
use super::path::Path;
use serde::{Deserialize, Serialize};

/// Counters collected while building the HOFG
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub functions_scanned: usize,
    pub instructions_scanned: usize,
    pub allocations: usize,
    pub deallocations: usize,
    pub copies: usize,
    pub field_copies: usize,
    pub stores: usize,
    pub merges: usize,
    pub returns: usize,
    pub calls: usize,
    pub summaries_instantiated: usize,
    /// Operands/callees/argument indices that could not be resolved
    pub unresolved: usize,
}

/// How the fixpoint loop ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixpointOutcome {
    pub rounds: usize,
    pub converged: bool,
}

/// Edges removed per cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionStats {
    pub duplicates: usize,
    pub reverse_pairs: usize,
    pub dead_ends: usize,
    pub self_loops: usize,
    /// Sweeps over all four passes until nothing changed
    pub sweeps: usize,
}

impl CompactionStats {
    pub fn removed(&self) -> usize {
        self.duplicates + self.reverse_pairs + self.dead_ends + self.self_loops
    }
}

/// Output of path enumeration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathEnumeration {
    pub paths: Vec<Path>,
    /// The path cutoff was hit; `paths` is incomplete
    pub partial: bool,
}

/// Output of the leak/dangling classifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakClassification {
    pub total_paths: usize,
    /// Paths reaching a sink through an unguarded edge
    pub unconditionally_freed: usize,
    /// Paths left after unconditional-free pruning
    pub may_leak: usize,
    /// Paths that never reach any sink
    pub never_freed: usize,
    pub issues: Vec<LeakIssue>,
}
