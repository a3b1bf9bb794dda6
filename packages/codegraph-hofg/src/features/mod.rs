//! Feature modules - each feature follows Hexagonal Architecture
//!
//! - domain/         - pure data and invariants
//! - ports/          - interface definitions (traits)
//! - application/    - use cases
//! - infrastructure/ - implementations

pub mod heap_flow;
pub mod ir_loading;
