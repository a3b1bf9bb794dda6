//! Leak and dangling-pointer issues

use crate::shared::models::{SourceLocation, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeakKind {
    /// The allocation result is never consumed
    UnusedAllocation,

    /// The object's last holder is never consumed further and never freed
    DanglingPointer,
}

impl fmt::Display for LeakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeakKind::UnusedAllocation => write!(f, "unused allocation"),
            LeakKind::DanglingPointer => write!(f, "dangling pointer"),
        }
    }
}

/// One reported issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeakIssue {
    pub kind: LeakKind,

    /// Allocation-site vertex the offending path starts at
    pub allocation: ValueId,

    /// Value the flow ends at (the allocation itself for unused allocations)
    pub last_holder: ValueId,

    /// Location of the edge ending the flow; `None` for synthesized edges
    pub location: Option<SourceLocation>,

    /// Location of the allocation call
    pub allocation_site: Option<SourceLocation>,
}

impl LeakIssue {
    /// Unused allocation, reported at the allocation site
    pub fn unused_allocation(allocation: ValueId, site: Option<SourceLocation>) -> Self {
        Self {
            kind: LeakKind::UnusedAllocation,
            allocation,
            last_holder: allocation,
            location: site.clone(),
            allocation_site: site,
        }
    }

    /// Dangling pointer at the edge that ends the flow
    pub fn dangling_pointer(
        allocation: ValueId,
        last_holder: ValueId,
        location: Option<SourceLocation>,
        allocation_site: Option<SourceLocation>,
    ) -> Self {
        Self {
            kind: LeakKind::DanglingPointer,
            allocation,
            last_holder,
            location,
            allocation_site,
        }
    }
}

impl LeakIssue {
    /// Edge location, or the allocation site when the edge was synthesized
    pub fn reported_location(&self) -> Option<&SourceLocation> {
        self.location.as_ref().or(self.allocation_site.as_ref())
    }
}

impl fmt::Display for LeakIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reported_location() {
            Some(location) => write!(f, "{} at {}", self.kind, location),
            None => write!(f, "{} (no debug location)", self.kind),
        }
    }
}
