//! Engine configuration
//!
//! Loaded from YAML; every key is optional and falls back to its default.
//!
//! ```yaml
//! max_path_depth: 4
//! recommendation_limit: 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables of the social engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Hop bound used by `PathFinder`
    pub max_path_depth: usize,
    /// Result cap used by `RecommendationEngine`
    pub recommendation_limit: usize,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            max_path_depth: 4,
            recommendation_limit: 10,
        }
    }
}

impl SocialConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SocialConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_path_depth == 0 {
            return Err(ConfigError::Invalid("max_path_depth must be positive".to_string()));
        }
        if self.recommendation_limit == 0 {
            return Err(ConfigError::Invalid(
                "recommendation_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
