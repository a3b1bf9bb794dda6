//! Report generation
//!
//! Renders a `HeapFlowResult` as plain text, JSON or Graphviz DOT.

pub mod dot;
pub mod json;
pub mod text;

pub use dot::DotReporter;
pub use json::JsonReporter;
pub use text::TextReporter;

use crate::errors::{HofgError, Result};
use crate::features::heap_flow::HeapFlowResult;
use std::fmt;

/// Output format of the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "dot" | "graphviz" => Ok(Self::Dot),
            _ => Err(HofgError::Report(format!(
                "unknown report format '{}'. Valid formats: text, json, dot",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Dot => "dot",
        }
    }

    /// Render `result` in this format
    pub fn render(&self, result: &HeapFlowResult) -> Result<String> {
        match self {
            Self::Text => Ok(TextReporter::render(result)),
            Self::Json => JsonReporter::render(result),
            Self::Dot => Ok(DotReporter::render(result)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
