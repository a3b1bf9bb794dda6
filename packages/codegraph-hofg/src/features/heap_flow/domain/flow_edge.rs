//! HOFG flow edges
//!
//! `tail → head` means a value reaches `head` from `tail`. Guard conditions
//! approximate path sensitivity: a flow with guards only happens when every
//! guard holds.

use super::vertex::Vertex;
use crate::shared::models::{SourceLocation, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Branch conditions that must hold for a flow to execute
pub type GuardSet = BTreeSet<ValueId>;

/// How an edge came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOrigin {
    /// Emitted directly from an instruction of the function being scanned
    Local,

    /// Synthesized by instantiating a callee summary at this call instruction
    CallSite(ValueId),
}

/// Edge identity
///
/// Local edges are identified by (tail, head, guards), instantiated edges by
/// (tail, head, call site): the same flow instantiated at two call sites is
/// two edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Guarded {
        tail: ValueId,
        head: ValueId,
        guards: GuardSet,
    },
    CallSite {
        tail: ValueId,
        head: ValueId,
        call_site: ValueId,
    },
}

/// Directed value flow between two vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub tail: Vertex,
    pub head: Vertex,
    pub guards: GuardSet,
    /// Absent for synthesized edges with no direct instruction
    pub location: Option<SourceLocation>,
    pub origin: EdgeOrigin,
}

impl FlowEdge {
    pub fn new(tail: Vertex, head: Vertex) -> Self {
        Self {
            tail,
            head,
            guards: GuardSet::new(),
            location: None,
            origin: EdgeOrigin::Local,
        }
    }

    pub fn with_guards(mut self, guards: GuardSet) -> Self {
        self.guards = guards;
        self
    }

    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    pub fn at_call_site(mut self, call: ValueId) -> Self {
        self.origin = EdgeOrigin::CallSite(call);
        self
    }

    pub fn key(&self) -> EdgeKey {
        match self.origin {
            EdgeOrigin::Local => EdgeKey::Guarded {
                tail: self.tail.value,
                head: self.head.value,
                guards: self.guards.clone(),
            },
            EdgeOrigin::CallSite(call_site) => EdgeKey::CallSite {
                tail: self.tail.value,
                head: self.head.value,
                call_site,
            },
        }
    }

    /// Flow identity ignoring origin, used to collapse exact duplicates
    pub fn flow_key(&self) -> (ValueId, ValueId, &GuardSet) {
        (self.tail.value, self.head.value, &self.guards)
    }

    #[inline]
    pub fn is_unconditional(&self) -> bool {
        self.guards.is_empty()
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.tail.value == self.head.value
    }
}

impl PartialEq for FlowEdge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FlowEdge {}
