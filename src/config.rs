//! Platform configuration
//!
//! Loaded from YAML; every key is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Directedness of graphs created without an explicit graph
    pub directed: bool,
    /// `tracing` filter directive used by the binary
    pub log_filter: String,
    /// Workspace ids are `{workspace_prefix}{n}`
    pub workspace_prefix: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            directed: false,
            log_filter: "info".to_string(),
            workspace_prefix: "workspace".to_string(),
        }
    }
}

impl PlatformConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}
