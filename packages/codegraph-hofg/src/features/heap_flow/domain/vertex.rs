//! HOFG vertices

use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Vertex kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Heap allocation site (the allocating call itself)
    Object,

    /// Pointer-valued entity: local, parameter, global, call result
    Pointer,

    /// Deallocation call site
    Sink,
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexKind::Object => write!(f, "object"),
            VertexKind::Pointer => write!(f, "pointer"),
            VertexKind::Sink => write!(f, "sink"),
        }
    }
}

/// HOFG vertex
///
/// Identity is the underlying program entity: two vertices over the same
/// value are equal whatever their kind, so a value has at most one vertex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub value: ValueId,
    pub kind: VertexKind,
}

impl Vertex {
    #[inline]
    pub fn object(value: ValueId) -> Self {
        Self {
            value,
            kind: VertexKind::Object,
        }
    }

    #[inline]
    pub fn pointer(value: ValueId) -> Self {
        Self {
            value,
            kind: VertexKind::Pointer,
        }
    }

    #[inline]
    pub fn sink(value: ValueId) -> Self {
        Self {
            value,
            kind: VertexKind::Sink,
        }
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        self.kind == VertexKind::Object
    }

    #[inline]
    pub fn is_sink(&self) -> bool {
        self.kind == VertexKind::Sink
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}
