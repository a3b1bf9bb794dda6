//! Heap Flow Infrastructure - Port Implementations and Analysis Phases
//!
//! ```text
//! infrastructure/
//! ├── name_classifier.rs   # CallClassifier over configured name lists
//! ├── guard_index.rs       # per-block predecessor closure + branch conditions
//! ├── summary_table.rs     # function summaries with in-progress markers
//! ├── builder.rs           # instruction pattern handlers
//! ├── call_site.rs         # parameter binding + summary instantiation
//! ├── fixpoint.rs          # round loop over the builder
//! ├── compactor.rs         # post-fixpoint edge cleanup
//! ├── path_enumerator.rs   # cycle-guarded walks from allocation sites
//! └── leak_classifier.rs   # may-leak pruning + issue reports
//! ```

pub mod builder;
mod call_site;
pub mod compactor;
pub mod fixpoint;
pub mod guard_index;
pub mod leak_classifier;
pub mod name_classifier;
pub mod path_enumerator;
pub mod summary_table;

pub use builder::HofgBuilder;
pub use compactor::GraphCompactor;
pub use fixpoint::FixpointDriver;
pub use guard_index::{BasicBlockGuard, GuardIndex};
pub use leak_classifier::LeakClassifier;
pub use name_classifier::NameListClassifier;
pub use path_enumerator::PathEnumerator;
pub use summary_table::{SummaryState, SummaryTable};
