//! Fixpoint driver
//!
//! Rounds are strictly sequential: each one rescans every function, then the
//! graph snapshot is compared with the previous round's. Compaction never
//! runs inside the loop, so within it the graph only grows.

use super::builder::HofgBuilder;
use crate::features::heap_flow::domain::{FixpointOutcome, GraphSnapshot};

/// Repeats whole-module building until the graph stops changing
#[derive(Debug, Clone, Copy)]
pub struct FixpointDriver {
    max_rounds: usize,
}

impl FixpointDriver {
    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }

    /// Run until the (vertices, edges) snapshot and the recorded summary
    /// evidence are unchanged, or the round cap is hit
    pub fn run(&self, builder: &mut HofgBuilder<'_>) -> FixpointOutcome {
        let mut previous = Self::state(builder);

        for round in 1..=self.max_rounds {
            builder.build_round();

            let current = Self::state(builder);
            tracing::debug!(
                "Fixpoint round {}: {} vertices, {} edges, {} summary facts",
                round,
                current.0.vertices,
                current.0.edges,
                current.1
            );

            if current == previous {
                return FixpointOutcome {
                    rounds: round,
                    converged: true,
                };
            }
            previous = current;
        }

        tracing::warn!(
            "HOFG did not converge within {} rounds; reporting the current graph",
            self.max_rounds
        );
        FixpointOutcome {
            rounds: self.max_rounds,
            converged: false,
        }
    }

    fn state(builder: &HofgBuilder<'_>) -> (GraphSnapshot, usize) {
        (builder.graph().snapshot(), builder.summaries().evidence())
    }
}
