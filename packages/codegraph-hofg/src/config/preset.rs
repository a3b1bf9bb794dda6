//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: few fixpoint rounds, small path budget
    ///
    /// - max_rounds=4, max_paths=10_000
    Fast,

    /// Development: default limits
    ///
    /// - max_rounds=16, max_paths=100_000
    Balanced,

    /// Audit: generous limits for large translation units
    ///
    /// - max_rounds=64, max_paths=1_000_000
    Thorough,

    /// Custom: balanced limits, no allocator/deallocator names
    ///
    /// Users must supply names via YAML or the builder API.
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }

    /// Fixpoint round cap for this preset
    pub fn max_rounds(&self) -> usize {
        match self {
            Self::Fast => 4,
            Self::Balanced | Self::Custom => 16,
            Self::Thorough => 64,
        }
    }

    /// Path enumeration cutoff for this preset
    pub fn max_paths(&self) -> usize {
        match self {
            Self::Fast => 10_000,
            Self::Balanced | Self::Custom => 100_000,
            Self::Thorough => 1_000_000,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}
