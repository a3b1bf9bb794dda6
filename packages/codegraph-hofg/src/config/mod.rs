//! Configuration System
//!
//! Two tiers:
//! - Preset: one-liner defaults (`HofgConfig::from_preset(Preset::Fast)`)
//! - YAML: versioned file with per-field overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_hofg::config::{HofgConfig, Preset};
//!
//! let config = HofgConfig::from_preset(Preset::Thorough)
//!     .add_allocator_wrapper("xmalloc")
//!     .max_paths(50_000);
//! config.validate()?;
//!
//! let config = HofgConfig::from_yaml("hofg.yaml")?;
//! ```

pub mod error;
pub mod hofg_config;
pub mod io;
pub mod preset;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use hofg_config::{HofgConfig, MAX_PATHS_LIMIT, MAX_ROUNDS_LIMIT};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
