//! Pipeline configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Where proof messages are searched: one conversation + sub-channel pair
/// designated for proof posting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchScope {
    pub conversation_id: String,
    pub channel_id: String,
}

/// Configuration for one proof pipeline.
///
/// Can be loaded from a TOML file via [`PipelineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of this platform as it appears in signed payloads' `link_target`.
    pub platform_name: String,

    /// Where to search for proof messages.
    pub scope: SearchScope,

    /// When true (default), a batch where every candidate failed returns an
    /// empty set instead of failing the call.
    #[serde(default = "default_true")]
    pub suppress_errors: bool,

    /// When true (default), later claims for an already-proven identity
    /// pair are marked as duplicates.
    #[serde(default = "default_true")]
    pub deduplicate: bool,

    /// Maximum candidate verifications in flight at once. Bounds pressure
    /// on the identity provider's key endpoint.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    4
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl PipelineConfig {
    /// A config with default flags for the given platform and scope.
    pub fn new(platform_name: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            platform_name: platform_name.into(),
            scope,
            suppress_errors: default_true(),
            deduplicate: default_true(),
            max_concurrent: default_max_concurrent(),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
