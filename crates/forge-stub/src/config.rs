//! Planner configuration
//!
//! Read from a flat TOML document; every key is optional:
//!
//! ```toml
//! auth_header = "Authorization"
//! auth_param = "authHeader"
//! optional_collections = true
//! parallel = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options that shape every plan produced by the planners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Header that carries the bearer token of authenticated endpoints
    pub auth_header: String,

    /// Local name of the synthetic bearer token argument
    pub auth_param: String,

    /// Allow optional<list<T>> and optional<set<T>> at header and query locations
    pub optional_collections: bool,

    /// Plan endpoints on the rayon thread pool
    pub parallel: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            auth_header: "Authorization".to_string(),
            auth_param: "authHeader".to_string(),
            optional_collections: true,
            parallel: false,
        }
    }
}

impl PlannerConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Set the auth header name
    pub fn with_auth_header(mut self, name: impl Into<String>) -> Self {
        self.auth_header = name.into();
        self
    }

    /// Enable or disable optional collections at header/query locations
    pub fn with_optional_collections(mut self, allowed: bool) -> Self {
        self.optional_collections = allowed;
        self
    }

    /// Enable or disable parallel endpoint planning
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
