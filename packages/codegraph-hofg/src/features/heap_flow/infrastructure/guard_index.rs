//! Basic-block guard index
//!
//! For every block: the transitive predecessor closure and the branch
//! conditions under which control reaches it. A block collects the condition
//! of every conditional predecessor whose taken (`then`) edge leads to it,
//! plus everything its predecessors collected.

use crate::features::heap_flow::domain::GuardSet;
use crate::shared::models::{BlockId, Function, InstKind};
use rustc_hash::FxHashMap;
use std::collections::{BTreeSet, VecDeque};

/// Guard information of one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlockGuard {
    /// Transitive predecessors (may contain the block itself inside loops)
    pub predecessors: BTreeSet<BlockId>,

    /// Conditions collected along every predecessor chain
    pub conditions: GuardSet,

    /// Conditions of immediate predecessors only
    pub entry_conditions: GuardSet,
}

/// Guards of every block of one function
#[derive(Debug, Clone, Default)]
pub struct GuardIndex {
    guards: FxHashMap<BlockId, BasicBlockGuard>,
}

impl GuardIndex {
    /// Compute guards for all blocks; closures already computed are reused
    /// instead of being walked again.
    pub fn compute(function: &Function) -> Self {
        let preds = function.predecessors();
        let immediate = Self::immediate_conditions(function);

        let mut guards: FxHashMap<BlockId, BasicBlockGuard> = FxHashMap::default();
        for block in &function.blocks {
            let guard = Self::close(block.id, &preds, &immediate, &guards);
            guards.insert(block.id, guard);
        }

        Self { guards }
    }

    /// `then` target → conditions of the branches taking it
    fn immediate_conditions(function: &Function) -> FxHashMap<BlockId, GuardSet> {
        let mut immediate: FxHashMap<BlockId, GuardSet> = FxHashMap::default();
        for block in &function.blocks {
            if let Some(InstKind::CondBr {
                condition,
                then_block,
                else_block,
            }) = block.terminator().map(|t| &t.kind)
            {
                // Both edges to the same block: reaching it needs no condition
                if then_block != else_block {
                    immediate.entry(*then_block).or_default().insert(*condition);
                }
            }
        }
        immediate
    }

    fn close(
        block: BlockId,
        preds: &FxHashMap<BlockId, Vec<BlockId>>,
        immediate: &FxHashMap<BlockId, GuardSet>,
        memo: &FxHashMap<BlockId, BasicBlockGuard>,
    ) -> BasicBlockGuard {
        let entry_conditions = immediate.get(&block).cloned().unwrap_or_default();
        let mut conditions = entry_conditions.clone();
        let mut predecessors = BTreeSet::new();

        let mut queue: VecDeque<BlockId> = preds.get(&block).into_iter().flatten().copied().collect();
        while let Some(pred) = queue.pop_front() {
            if !predecessors.insert(pred) {
                continue;
            }

            if let Some(done) = memo.get(&pred) {
                predecessors.extend(done.predecessors.iter().copied());
                conditions.extend(done.conditions.iter().copied());
                continue;
            }

            if let Some(conds) = immediate.get(&pred) {
                conditions.extend(conds.iter().copied());
            }
            queue.extend(preds.get(&pred).into_iter().flatten().copied());
        }

        BasicBlockGuard {
            predecessors,
            conditions,
            entry_conditions,
        }
    }

    pub fn guard(&self, block: BlockId) -> Option<&BasicBlockGuard> {
        self.guards.get(&block)
    }

    /// Transitive conditions (empty for unknown blocks)
    pub fn conditions(&self, block: BlockId) -> GuardSet {
        self.guard(block)
            .map(|g| g.conditions.clone())
            .unwrap_or_default()
    }

    /// Immediate entry conditions (empty for unknown blocks)
    pub fn entry_conditions(&self, block: BlockId) -> GuardSet {
        self.guard(block)
            .map(|g| g.entry_conditions.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}
