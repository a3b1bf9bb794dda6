//! Error types for codegraph-hofg
//!
//! Only failures that prevent the analysis from running at all are errors.
//! Unresolved references, non-convergence and path explosion are recovered
//! inside the analysis and surface as flags on the result instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for codegraph-hofg operations
#[derive(Debug, Error)]
pub enum HofgError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (IR or configuration could not be decoded)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The IR decoded but cannot be traversed (dangling ids, duplicate definitions)
    #[error("Malformed IR: {0}")]
    MalformedIr(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report rendering error
    #[error("Report error: {0}")]
    Report(String),
}

impl HofgError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        HofgError::Parse(msg.into())
    }

    /// Create a malformed-IR error
    pub fn malformed(msg: impl Into<String>) -> Self {
        HofgError::MalformedIr(msg.into())
    }
}

impl From<serde_json::Error> for HofgError {
    fn from(err: serde_json::Error) -> Self {
        HofgError::Parse(err.to_string())
    }
}

/// Result type alias for HOFG operations
pub type Result<T> = std::result::Result<T, HofgError>;
