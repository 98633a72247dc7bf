//! Resource tree configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Configuration for traversal and attribute resolution.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TreeConfig {
    /// Attribute names starting with this prefix are never delegated to
    /// parent resources.
    #[builder(default = "default_private_prefix()")]
    #[serde(default = "default_private_prefix")]
    pub private_prefix: String,

    /// Deepest node a lookup may produce (root is depth 0, None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_private_prefix() -> String {
    "_".to_string()
}

impl TreeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.private_prefix {
            Some(ref prefix) if prefix.is_empty() => {
                Err("Private prefix cannot be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl TreeConfig {
    /// Create a new config builder.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, TreeError> {
        let config: Self = toml::from_str(text).map_err(|e| TreeError::InvalidConfig {
            message: e.to_string(),
        })?;
        if config.private_prefix.is_empty() {
            return Err(TreeError::InvalidConfig {
                message: "Private prefix cannot be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Check if an attribute name is private.
    pub fn is_private(&self, name: &str) -> bool {
        name.starts_with(&self.private_prefix)
    }

    /// Check if a node at `depth` is within the configured limit.
    pub fn allows_depth(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            private_prefix: default_private_prefix(),
            max_depth: None,
        }
    }
}
