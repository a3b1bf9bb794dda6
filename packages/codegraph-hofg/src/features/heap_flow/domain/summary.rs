//! Function summaries
//!
//! A summary records what a function does to heap objects reachable from its
//! arguments, from globals and through its return value, so a call site can
//! project that behaviour into the caller without rescanning the callee.

use crate::shared::models::{FunctionId, IrType, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Effect of a function on one of its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// The argument receives a fresh heap object (output parameter)
    Allocator,

    /// The argument's referent is consumed/freed inside the function
    Deallocator,
}

/// Overall classification, derived from the argument transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Allocator,
    Deallocator,
    AllocDealloc,
    Noop,
}

impl Classification {
    pub fn from_transforms<'a>(transforms: impl IntoIterator<Item = &'a ArgumentTransform>) -> Self {
        let (mut allocates, mut frees) = (false, false);
        for t in transforms {
            match t.kind {
                TransformKind::Allocator => allocates = true,
                TransformKind::Deallocator => frees = true,
            }
        }
        match (allocates, frees) {
            (true, true) => Classification::AllocDealloc,
            (true, false) => Classification::Allocator,
            (false, true) => Classification::Deallocator,
            (false, false) => Classification::Noop,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Allocator => write!(f, "allocator"),
            Classification::Deallocator => write!(f, "deallocator"),
            Classification::AllocDealloc => write!(f, "alloc-dealloc"),
            Classification::Noop => write!(f, "noop"),
        }
    }
}

/// `(argument index, transform)`; the set holds at most one entry per kind per index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArgumentTransform {
    pub index: usize,
    pub kind: TransformKind,
}

/// Per-function summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub function: FunctionId,
    pub name: String,
    pub classification: Classification,
    pub formal_arguments: Vec<ValueId>,
    pub argument_transforms: BTreeSet<ArgumentTransform>,
    /// Stores that publish a heap pointer into a global
    pub global_allocations: BTreeSet<ValueId>,
    /// Deallocation calls whose pointer comes from a global
    pub global_deallocations: BTreeSet<ValueId>,
    pub return_type: IrType,
    /// Returned values that carry pointer flow
    pub return_values: BTreeSet<ValueId>,
    /// Some returned value is an allocation site or is fed directly by one
    pub return_taint: bool,
}

impl FunctionSummary {
    pub fn new(
        function: FunctionId,
        name: impl Into<String>,
        formal_arguments: Vec<ValueId>,
        return_type: IrType,
    ) -> Self {
        Self {
            function,
            name: name.into(),
            classification: Classification::Noop,
            formal_arguments,
            argument_transforms: BTreeSet::new(),
            global_allocations: BTreeSet::new(),
            global_deallocations: BTreeSet::new(),
            return_type,
            return_values: BTreeSet::new(),
            return_taint: false,
        }
    }

    /// Record a transform and refresh the classification
    ///
    /// Returns `true` if the transform is new.
    pub fn record_transform(&mut self, index: usize, kind: TransformKind) -> bool {
        let added = self
            .argument_transforms
            .insert(ArgumentTransform { index, kind });
        if added {
            self.reclassify();
        }
        added
    }

    pub fn reclassify(&mut self) {
        self.classification = Classification::from_transforms(&self.argument_transforms);
    }

    pub fn has_transform(&self, index: usize, kind: TransformKind) -> bool {
        self.argument_transforms
            .contains(&ArgumentTransform { index, kind })
    }

    /// Return values should flow into the caller's call result
    pub fn returns_heap(&self) -> bool {
        !self.return_values.is_empty()
            && (self.classification == Classification::Allocator || self.return_taint)
    }
}
