//! HOFG analysis configuration
//!
//! The allocator/deallocator name lists are external configuration, not
//! analysis logic: the analysis only asks a `CallClassifier` whether a callee
//! allocates or frees.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};

/// Upper bound for `max_rounds`
pub const MAX_ROUNDS_LIMIT: usize = 1000;

/// Upper bound for `max_paths`
pub const MAX_PATHS_LIMIT: usize = 10_000_000;

/// Heap Object Flow Graph analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HofgConfig {
    /// Callee names treated as allocators (`p = malloc(n)`)
    pub allocators: Vec<String>,

    /// Callee names treated as deallocators (`free(p)`)
    pub deallocators: Vec<String>,

    /// Allocator wrapper symbols. Calls to them are handled as allocations
    /// and their bodies are never summarized.
    #[serde(default)]
    pub allocator_wrappers: Vec<String>,

    /// Fixpoint round cap (1..=1000)
    pub max_rounds: usize,

    /// Path enumeration cutoff (1..=10_000_000)
    pub max_paths: usize,
}

impl HofgConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_rounds",
                self.max_rounds,
                1,
                MAX_ROUNDS_LIMIT,
                "The fixpoint needs at least one round",
            ));
        }

        if self.max_paths == 0 || self.max_paths > MAX_PATHS_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_paths",
                self.max_paths,
                1,
                MAX_PATHS_LIMIT,
                "Path cutoff must be reasonable",
            ));
        }

        if self.allocators.is_empty() && self.allocator_wrappers.is_empty() {
            return Err(ConfigError::EmptyNameList("allocators".to_string()));
        }

        if self.deallocators.is_empty() {
            return Err(ConfigError::EmptyNameList("deallocators".to_string()));
        }

        if let Some(name) = self
            .deallocators
            .iter()
            .find(|d| self.allocators.contains(d) || self.allocator_wrappers.contains(d))
        {
            return Err(ConfigError::ConflictingName(name.clone()));
        }

        Ok(())
    }

    /// Builder: Add allocator name
    pub fn add_allocator(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.allocators.contains(&name) {
            self.allocators.push(name);
        }
        self
    }

    /// Builder: Add deallocator name
    pub fn add_deallocator(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.deallocators.contains(&name) {
            self.deallocators.push(name);
        }
        self
    }

    /// Builder: Add allocator wrapper symbol
    pub fn add_allocator_wrapper(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.allocator_wrappers.contains(&name) {
            self.allocator_wrappers.push(name);
        }
        self
    }

    /// Builder: Set max_rounds
    pub fn max_rounds(mut self, v: usize) -> Self {
        self.max_rounds = v;
        self
    }

    /// Builder: Set max_paths
    pub fn max_paths(mut self, v: usize) -> Self {
        self.max_paths = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        let (allocators, deallocators) = match preset {
            Preset::Custom => (vec![], vec![]),
            _ => (
                vec!["malloc".to_string(), "calloc".to_string()],
                vec!["free".to_string()],
            ),
        };

        Self {
            allocators,
            deallocators,
            allocator_wrappers: vec![],
            max_rounds: preset.max_rounds(),
            max_paths: preset.max_paths(),
        }
    }
}

impl Default for HofgConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
