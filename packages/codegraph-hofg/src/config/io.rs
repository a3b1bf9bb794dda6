//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   allocators: [malloc, xmalloc]
//!   max_paths: 5000
//! ```

use super::error::{ConfigError, ConfigResult};
use super::hofg_config::HofgConfig;
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default)]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocators: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deallocators: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocator_wrappers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,
}

impl ConfigOverrides {
    /// Apply overrides on top of a base configuration
    pub fn apply(self, mut config: HofgConfig) -> HofgConfig {
        if let Some(v) = self.allocators {
            config.allocators = v;
        }
        if let Some(v) = self.deallocators {
            config.deallocators = v;
        }
        if let Some(v) = self.allocator_wrappers {
            config.allocator_wrappers = v;
        }
        if let Some(v) = self.max_rounds {
            config.max_rounds = v;
        }
        if let Some(v) = self.max_paths {
            config.max_paths = v;
        }
        config
    }
}

impl HofgConfig {
    /// Load and validate configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match export.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };

        let base = HofgConfig::from_preset(preset);
        let config = match export.overrides {
            Some(overrides) => overrides.apply(base),
            None => base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as YAML (custom preset with every field overridden)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: Some(Preset::Custom.as_str().to_string()),
            overrides: Some(ConfigOverrides {
                allocators: Some(self.allocators.clone()),
                deallocators: Some(self.deallocators.clone()),
                allocator_wrappers: Some(self.allocator_wrappers.clone()),
                max_rounds: Some(self.max_rounds),
                max_paths: Some(self.max_paths),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}
