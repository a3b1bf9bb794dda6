//! JSON IR adapter

use super::IrProvider;
use crate::errors::{HofgError, Result};
use crate::shared::models::IrModule;
use std::path::{Path, PathBuf};

/// Source of the JSON document
#[derive(Debug, Clone)]
enum JsonSource {
    File(PathBuf),
    Text(String),
}

/// Reads an `IrModule` serialized with serde_json
#[derive(Debug, Clone)]
pub struct JsonIrProvider {
    source: JsonSource,
}

impl JsonIrProvider {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: JsonSource::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_json(text: impl Into<String>) -> Self {
        Self {
            source: JsonSource::Text(text.into()),
        }
    }

    fn parse(text: &str, origin: &str) -> Result<IrModule> {
        serde_json::from_str(text)
            .map_err(|e| HofgError::parse_error(format!("{}: {}", origin, e)))
    }
}

impl IrProvider for JsonIrProvider {
    fn load(&self) -> Result<IrModule> {
        let module = match &self.source {
            JsonSource::File(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::parse(&text, &path.display().to_string())?
            }
            JsonSource::Text(text) => Self::parse(text, "<inline>")?,
        };

        tracing::debug!(
            "Loaded IR module '{}' ({} functions) from {}",
            module.name,
            module.functions.len(),
            self.describe()
        );
        Ok(module)
    }

    fn describe(&self) -> String {
        match &self.source {
            JsonSource::File(path) => path.display().to_string(),
            JsonSource::Text(_) => "<inline>".to_string(),
        }
    }
}
