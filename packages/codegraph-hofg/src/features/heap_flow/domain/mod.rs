//! Heap Flow Domain - graph, summaries, paths and issues
//!
//! Pure data and the invariants that go with it; no IR traversal here.

pub mod flow_edge;
pub mod graph;
pub mod issue;
pub mod path;
pub mod stats;
pub mod summary;
pub mod vertex;

pub use flow_edge::{EdgeKey, EdgeOrigin, FlowEdge, GuardSet};
pub use graph::{GraphSnapshot, Hofg};
pub use issue::{LeakIssue, LeakKind};
pub use path::Path;
pub use stats::{
    BuildStats, CompactionStats, FixpointOutcome, LeakClassification, PathEnumeration,
};
pub use summary::{ArgumentTransform, Classification, FunctionSummary, TransformKind};
pub use vertex::{Vertex, VertexKind};
