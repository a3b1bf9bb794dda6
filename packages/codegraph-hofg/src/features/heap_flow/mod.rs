//! Heap Flow - leak and dangling-pointer detection over a Heap Object Flow Graph
//!
//! ## Hexagonal Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ Application     HeapFlowAnalysisService                       │
//! │                        │ uses                                 │
//! │ Ports           HeapFlowAnalyzerPort, CallClassifier          │
//! │                        │ implemented by                       │
//! │ Infrastructure  HofgBuilder, FixpointDriver, GraphCompactor,  │
//! │                 PathEnumerator, LeakClassifier, ...           │
//! │                        │ operates on                          │
//! │ Domain          Vertex, FlowEdge, Hofg, FunctionSummary,      │
//! │                 Path, LeakIssue                               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Phases
//!
//! 1. **Build**: scan every function, emitting vertices (allocation sites,
//!    pointers, deallocation sinks) and guarded flow edges; callees are
//!    summarized once and instantiated at each call site.
//! 2. **Fixpoint**: repeat the build until the graph snapshot is stable.
//! 3. **Compaction**: drop duplicate, mutual-reverse, dead-end and
//!    self-loop edges.
//! 4. **Paths**: enumerate cycle-free walks from every allocation site.
//! 5. **Classification**: prune unconditionally freed paths and report
//!    unused allocations and dangling pointers.
//!
//! The analysis is neither sound nor complete; it may over- and under-report.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::HeapFlowAnalysisService;
pub use domain::{
    BuildStats, Classification, CompactionStats, EdgeOrigin, FixpointOutcome, FlowEdge,
    FunctionSummary, GraphSnapshot, Hofg, LeakClassification, LeakIssue, LeakKind, Path,
    TransformKind, Vertex, VertexKind,
};
pub use infrastructure::NameListClassifier;
pub use ports::{CallClassifier, HeapFlowAnalyzerPort, HeapFlowResult};
